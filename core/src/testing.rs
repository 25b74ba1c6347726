//! Recording transport used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::auth::StaticHeaders;
use crate::client::ServiceClient;
use crate::error::{Service, TransportError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::models::{Acl, Legal, Record};

pub const BASE_URL: &str = "http://osdu.test";

enum Reply {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn respond(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Response(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, message: &str) {
        self.replies.lock().unwrap().push_back(Reply::Failure(message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(TransportError::new(message)),
            None => Ok(HttpResponse::new(200, "{}")),
        }
    }
}

/// A service client wired to a fresh mock transport and a static bearer token.
pub fn client(service: Service, service_path: &str) -> (Arc<MockTransport>, ServiceClient) {
    let transport = Arc::new(MockTransport::default());
    let auth = Arc::new(StaticHeaders::default().with("Authorization", "Bearer token"));
    let client = ServiceClient::new(service, BASE_URL, service_path, auth, transport.clone());
    (transport, client)
}

/// Like [`client`], but returns the pieces needed by the typed service
/// constructors.
pub fn parts() -> (Arc<MockTransport>, Arc<StaticHeaders>) {
    let transport = Arc::new(MockTransport::default());
    let auth = Arc::new(StaticHeaders::default().with("Authorization", "Bearer token"));
    (transport, auth)
}

pub fn sample_record() -> Record {
    Record::new(
        "osdu:wks:master-data--Well:1.0.0",
        Acl {
            owners: vec!["data.default.owners@opendes.example.com".into()],
            viewers: vec!["data.default.viewers@opendes.example.com".into()],
        },
        Legal {
            legaltags: vec!["opendes-public-usa-dataset".into()],
            other_relevant_data_countries: vec!["US".into()],
            status: None,
        },
    )
}
