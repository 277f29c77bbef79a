use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Serialize;
use tera::Tera;

use crate::forms::FieldErrors;
use crate::forms::login::LoginForm;
use crate::models::auth::Operator;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::sign_in;

/// Landing page of a signed-in operator.
pub const HOME_PATH: &str = "/form";

#[derive(Default, Serialize)]
struct LoginPage<'a> {
    email: &'a str,
    errors: FieldErrors,
}

#[get("/")]
pub async fn show_login(
    operator: Option<Operator>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if operator.is_some() {
        return redirect(HOME_PATH);
    }

    let mut context = base_context(&flash_messages, "login", None);
    context.insert("login", &LoginPage::default());
    render_template(&tera, "login.html", &context)
}

#[post("/login")]
pub async fn login(
    request: HttpRequest,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let email = form.email.clone();

    match sign_in(repo.get_ref(), form).await {
        Ok(session) => match Identity::login(&request.extensions(), session.email) {
            Ok(_) => redirect(HOME_PATH),
            Err(err) => {
                log::error!("Failed to attach identity: {err}");
                FlashMessage::error("Não foi possível iniciar a sessão.".to_string()).send();
                redirect("/")
            }
        },
        Err(ServiceError::FieldErrors(errors)) => {
            let mut context = base_context(&flash_messages, "login", None);
            context.insert(
                "login",
                &LoginPage {
                    email: email.trim(),
                    errors,
                },
            );
            render_template(&tera, "login.html", &context)
        }
        Err(err) => {
            log::error!("Sign-in failed: {err}");
            FlashMessage::error("Não foi possível entrar. Tente novamente.".to_string()).send();
            redirect("/")
        }
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
