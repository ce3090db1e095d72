// Scripted transport for tests: replies in queue order and records every
// request it was asked to send.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::services::api_client::ApiError;
use crate::services::http::{HttpRequest, HttpResponse, HttpTransport};

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    requests: Rc<RefCell<Vec<HttpRequest>>>,
    replies: Rc<RefCell<VecDeque<Result<HttpResponse, ApiError>>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, status: u16, body: &str) -> &Self {
        let status_text = match status {
            200 => "OK",
            201 => "Created",
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        };
        self.respond(HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        })
    }

    pub(crate) fn respond(&self, response: HttpResponse) -> &Self {
        self.replies.borrow_mut().push_back(Ok(response));
        self
    }

    pub(crate) fn fail(&self, error: ApiError) -> &Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_string())))
    }
}
