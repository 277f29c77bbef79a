//! In-process stand-in for the remote ticket API and the postal-code service.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Map, Value, json};

/// Credentials accepted by the stub login endpoint.
pub const OPERATOR_EMAIL: &str = "op@example.com";
pub const OPERATOR_PASSWORD: &str = "secret";
/// MD5 of [`OPERATOR_PASSWORD`].
pub const OPERATOR_PASSWORD_MD5: &str = "5ebe2294ecd0e0f08eab7690d2a6ee69";

/// Accounts the stub refuses with a bare status and no error marker.
pub const UNAUTHORIZED_EMAIL: &str = "expired@example.com";
pub const FORBIDDEN_EMAIL: &str = "locked@example.com";

/// Postal code the stub resolves to an address.
pub const KNOWN_CEP: &str = "01310100";

#[derive(Default)]
struct Store {
    next_id: u32,
    tickets: BTreeMap<String, Map<String, Value>>,
    /// Requests served per endpoint name.
    calls: BTreeMap<&'static str, usize>,
}

impl Store {
    fn record(&mut self, endpoint: &'static str) {
        *self.calls.entry(endpoint).or_default() += 1;
    }
}

type SharedStore = web::Data<Mutex<Store>>;

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "code": 404,
        "error": true,
        "message": "Ticket not found"
    }))
}

async fn list_tickets(store: SharedStore) -> HttpResponse {
    let mut store = store.lock().unwrap();
    store.record("list");
    let tickets: Vec<_> = store.tickets.values().cloned().collect();
    HttpResponse::Ok().json(tickets)
}

async fn get_ticket(store: SharedStore, id: web::Path<String>) -> HttpResponse {
    let mut store = store.lock().unwrap();
    store.record("get");
    match store.tickets.get(id.as_str()) {
        Some(ticket) => HttpResponse::Ok().json(ticket),
        None => not_found(),
    }
}

async fn create_ticket(store: SharedStore, body: web::Json<Map<String, Value>>) -> HttpResponse {
    let mut store = store.lock().unwrap();
    store.record("create");
    store.next_id += 1;
    let id = format!("t{:04}", store.next_id);

    let mut ticket = body.into_inner();
    ticket.insert("_id".to_string(), Value::String(id.clone()));
    store.tickets.insert(id, ticket.clone());

    HttpResponse::Created().json(json!({
        "code": 201,
        "message": "Etiqueta criada com sucesso!",
        "data": ticket
    }))
}

async fn update_ticket(
    store: SharedStore,
    id: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let mut store = store.lock().unwrap();
    store.record("update");
    match store.tickets.get_mut(id.as_str()) {
        Some(ticket) => {
            ticket.extend(body.into_inner());
            HttpResponse::Ok().json(json!({ "code": 200, "message": "Dados atualizados" }))
        }
        None => not_found(),
    }
}

async fn delete_ticket(store: SharedStore, id: web::Path<String>) -> HttpResponse {
    let mut store = store.lock().unwrap();
    store.record("delete");
    match store.tickets.remove(id.as_str()) {
        Some(_) => HttpResponse::Ok().json(json!({ "code": 200, "message": "Etiqueta removida" })),
        None => not_found(),
    }
}

/// Accepts any 11 or 14 digit document that is not a single repeated digit.
async fn validate_document(body: web::Json<Value>) -> HttpResponse {
    let document = body["document"].as_str().unwrap_or_default().to_string();
    let repeated = document
        .chars()
        .next()
        .is_some_and(|first| document.chars().all(|c| c == first));
    let valid = matches!(document.len(), 11 | 14) && !repeated;
    let formatted = match document.len() {
        11 if valid => format!(
            "{}.{}.{}-{}",
            &document[0..3],
            &document[3..6],
            &document[6..9],
            &document[9..11]
        ),
        _ => String::new(),
    };
    HttpResponse::Ok().json(json!({ "valid": valid, "formatted": formatted }))
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if email == UNAUTHORIZED_EMAIL {
        return HttpResponse::Unauthorized().json(json!({ "message": "Unauthorized" }));
    }
    if email == FORBIDDEN_EMAIL {
        return HttpResponse::Forbidden().finish();
    }
    if email != OPERATOR_EMAIL {
        return HttpResponse::Unauthorized().json(json!({
            "error": true,
            "isEmailError": true,
            "message": "Email não cadastrado"
        }));
    }
    if password != OPERATOR_PASSWORD_MD5 {
        return HttpResponse::Unauthorized().json(json!({
            "error": true,
            "isPasswordError": true,
            "message": "Senha incorreta"
        }));
    }
    HttpResponse::Ok().json(json!({ "token": "stub-token" }))
}

async fn lookup_cep(cep: web::Path<String>) -> HttpResponse {
    if cep.as_str() == KNOWN_CEP {
        HttpResponse::Ok().json(json!({
            "cep": KNOWN_CEP,
            "street": "Avenida Paulista",
            "neighborhood": "Bela Vista",
            "city": "São Paulo",
            "state": "SP"
        }))
    } else {
        HttpResponse::NotFound().json(json!({ "message": "CEP não encontrado" }))
    }
}

/// Running stub server.
pub struct StubApi {
    addr: SocketAddr,
    store: SharedStore,
}

impl StubApi {
    /// Base URL for [`shipping_tickets::repository::HttpRepository`].
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL for [`shipping_tickets::repository::CepLookup`].
    pub fn cep_url(&self) -> String {
        format!("http://{}/cep/v1", self.addr)
    }

    /// Requests served so far by `endpoint`: list, get, create, update or delete.
    pub fn calls(&self, endpoint: &str) -> usize {
        self.store
            .lock()
            .unwrap()
            .calls
            .get(endpoint)
            .copied()
            .unwrap_or_default()
    }
}

/// Starts the stub on an ephemeral port inside the current actix runtime.
pub fn start_stub_api() -> StubApi {
    let store: SharedStore = web::Data::new(Mutex::new(Store::default()));
    let handle = store.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .route("/api/data/tickets", web::get().to(list_tickets))
            .route("/api/data/ticket", web::post().to(create_ticket))
            .route("/api/data/ticket/{id}", web::get().to(get_ticket))
            .route("/api/data/ticket/{id}", web::put().to(update_ticket))
            .route("/api/data/ticket/{id}", web::delete().to(delete_ticket))
            .route("/api/data/document", web::post().to(validate_document))
            .route("/api/auth/login", web::post().to(login))
            .route("/cep/v1/{cep}", web::get().to(lookup_cep))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    StubApi {
        addr,
        store: handle,
    }
}
