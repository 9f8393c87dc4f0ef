//! Local HTTP endpoint for exercising the Sheets and webhook clients.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Received {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: String,
}

struct ServerState {
    replies: Mutex<VecDeque<(u16, String)>>,
    received: Arc<Mutex<Vec<Received>>>,
}

pub struct TestServer {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
    handle: ServerHandle,
}

impl TestServer {
    /// Serves the given (status, body) replies in order, then 200 with an empty body
    pub fn start(replies: Vec<(u16, String)>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(ServerState {
            replies: Mutex::new(replies.into()),
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .default_service(web::to(record))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        TestServer {
            base_url: format!("http://{}", addr),
            received,
            handle,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<ServerState>) -> HttpResponse {
    state.received.lock().unwrap().push(Received {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, reply) = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((200, String::new()));
    HttpResponse::build(StatusCode::from_u16(status).unwrap())
        .content_type("application/json")
        .body(reply)
}
