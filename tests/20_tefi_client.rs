mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tefi_api_rust::tefi::{PdfSource, TefiError};
use wiremock::matchers::header;
use wiremock::{MockServer, ResponseTemplate};

use common::*;

#[tokio::test]
async fn generates_pdf_with_fresh_login() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS123")).expect(1).mount(&server).await;
    pdf_call().respond_with(pdf_ok()).expect(1).mount(&server).await;

    let tefi = tefi_service(&server)?;
    let bytes = tefi.generate_pdf("42", "7").await?;
    assert_eq!(bytes, PDF_BYTES);

    let logins = requests_to(&server, REST_PATH).await?;
    assert_eq!(logins.len(), 1);
    let fields = form_fields(&logins[0]);
    assert_eq!(fields["method"], "login");
    assert_eq!(fields["input_type"], "JSON");
    assert_eq!(fields["response_type"], "JSON");
    let args = rest_data(&logins[0])?;
    assert_eq!(args["user_auth"]["user_name"], "svc");
    assert_eq!(args["user_auth"]["password"], "5ebe2294ecd0e0f08eab7690d2a6ee69");

    let pdfs = requests_to(&server, PDF_PATH).await?;
    assert_eq!(pdfs.len(), 1);
    assert_eq!(pdfs[0].url.query(), Some("entryPoint=generatePdf"));
    assert_eq!(
        String::from_utf8(pdfs[0].body.clone())?,
        "module=Fitac_fitac&task=pdf&templateID=7&uid=42"
    );
    assert_eq!(cookie_header(&pdfs[0]).as_deref(), Some("PHPSESSID=SESS123; Path=/;"));
    Ok(())
}

#[tokio::test]
async fn authenticate_is_idempotent_without_force_refresh() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS123")).expect(1).mount(&server).await;

    let tefi = tefi_service(&server)?;
    assert!(!tefi.is_authenticated().await);

    assert_eq!(tefi.authenticate(false).await?, "SESS123");
    assert_eq!(tefi.authenticate(false).await?, "SESS123");
    assert!(tefi.is_authenticated().await);
    assert_eq!(tefi.session_token().await.as_deref(), Some("SESS123"));
    Ok(())
}

#[tokio::test]
async fn force_refresh_logs_in_again() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(login_ok("SESS1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    login_call().respond_with(login_ok("SESS2")).expect(1).mount(&server).await;

    let tefi = tefi_service(&server)?;
    assert_eq!(tefi.authenticate(false).await?, "SESS1");
    assert_eq!(tefi.authenticate(true).await?, "SESS2");
    assert_eq!(tefi.session_token().await.as_deref(), Some("SESS2"));
    Ok(())
}

#[tokio::test]
async fn login_without_id_is_an_authentication_error() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Invalid Login",
            "number": 10,
            "description": "Login attempt failed please check the username and password"
        })))
        .mount(&server)
        .await;
    pdf_call().respond_with(pdf_ok()).expect(0).mount(&server).await;

    let tefi = tefi_service(&server)?;
    let err = tefi.authenticate(false).await.unwrap_err();
    assert!(matches!(err, TefiError::Authentication(_)), "got {err:?}");
    assert!(err.to_string().contains("Login attempt failed"));
    assert!(!tefi.is_authenticated().await);

    let err = tefi.generate_pdf("42", "7").await.unwrap_err();
    assert!(matches!(err, TefiError::Authentication(ref msg) if msg.starts_with("FITAC 42 (template 7)")));
    assert!(!tefi.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn invalid_session_answer_to_login_fails_authentication() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Invalid Session ID",
            "number": 11,
            "description": "The session ID is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    let err = tefi.authenticate(false).await.unwrap_err();
    assert!(matches!(err, TefiError::Authentication(_)));
    assert!(err.to_string().contains("Invalid Session ID"));
    assert!(!tefi.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn login_http_failure_is_an_authentication_error() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(ResponseTemplate::new(503)).mount(&server).await;

    let tefi = tefi_service(&server)?;
    let err = tefi.authenticate(false).await.unwrap_err();
    assert!(matches!(err, TefiError::Authentication(ref msg) if msg.contains("HTTP 503")));
    Ok(())
}

#[tokio::test]
async fn expired_session_triggers_exactly_one_relogin() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(login_ok("SESS1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    login_call().respond_with(login_ok("SESS2")).mount(&server).await;
    pdf_call()
        .and(header("cookie", "PHPSESSID=SESS1; Path=/;"))
        .respond_with(pdf_session_expired())
        .mount(&server)
        .await;
    pdf_call()
        .and(header("cookie", "PHPSESSID=SESS2; Path=/;"))
        .respond_with(pdf_ok())
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    let bytes = tefi.generate_pdf("42", "7").await?;
    assert_eq!(bytes, PDF_BYTES);

    assert_eq!(requests_to(&server, REST_PATH).await?.len(), 2);
    let pdfs = requests_to(&server, PDF_PATH).await?;
    assert_eq!(pdfs.len(), 2);
    assert_eq!(cookie_header(&pdfs[1]).as_deref(), Some("PHPSESSID=SESS2; Path=/;"));
    assert_eq!(tefi.session_token().await.as_deref(), Some("SESS2"));
    Ok(())
}

#[tokio::test]
async fn expiry_cookie_wins_over_redirect_status() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS1")).expect(2).mount(&server).await;
    pdf_call()
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/index.php?action=Login&module=Users")
                .append_header("set-cookie", "PHPSESSID=deleted; path=/")
                .append_header("set-cookie", EXPIRED_COOKIE),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    pdf_call().respond_with(pdf_ok()).mount(&server).await;

    let tefi = tefi_service(&server)?;
    assert_eq!(tefi.generate_pdf("42", "7").await?, PDF_BYTES);
    assert_eq!(requests_to(&server, PDF_PATH).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn second_expiry_fails_without_third_attempt() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS1")).expect(2).mount(&server).await;
    pdf_call().respond_with(pdf_session_expired()).expect(2).mount(&server).await;

    let tefi = tefi_service(&server)?;
    let err = tefi.generate_pdf("42", "7").await.unwrap_err();
    match &err {
        TefiError::PdfGeneration(msg) => {
            assert!(msg.contains("FITAC 42"), "{msg}");
            assert!(msg.contains("Session expired again after re-authentication"), "{msg}");
        }
        other => panic!("expected PdfGeneration, got {other:?}"),
    }
    assert!(!tefi.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn transport_errors_are_not_retried() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS1")).expect(1).mount(&server).await;
    pdf_call()
        .respond_with(ResponseTemplate::new(500).set_body_string("Fatal error"))
        .expect(1)
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    let err = tefi.generate_pdf("42", "7").await.unwrap_err();
    match err {
        TefiError::Transport { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("HTTP 500: Internal Server Error"), "{message}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
    // The session itself is still good
    assert!(tefi.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn pdf_timeout_is_a_transport_error() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS1")).mount(&server).await;
    pdf_call()
        .respond_with(pdf_ok().set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&server)
        .await;

    let config = tefi_api_rust::tefi::TefiConfig::new(server.uri(), "svc", "secret")?
        .with_pdf_timeout(Some(Duration::from_millis(50)));
    let tefi = tefi_api_rust::tefi::TefiService::new(config)?;

    let err = tefi.generate_pdf("42", "7").await.unwrap_err();
    assert!(matches!(err, TefiError::Transport { status: None, .. }), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn login_timeout_leaves_session_unauthenticated() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(login_ok("SESS1").set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&server)
        .await;
    pdf_call().respond_with(pdf_ok()).expect(0).mount(&server).await;

    let config = tefi_api_rust::tefi::TefiConfig::new(server.uri(), "svc", "secret")?
        .with_rpc_timeout(Duration::from_millis(50));
    let tefi = tefi_api_rust::tefi::TefiService::new(config)?;

    let err = tefi.authenticate(false).await.unwrap_err();
    assert!(matches!(err, TefiError::Authentication(_)), "got {err:?}");
    assert!(!tefi.is_authenticated().await);
    assert!(tefi.session_token().await.is_none());
    Ok(())
}

#[tokio::test]
async fn clear_session_forces_a_new_login() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(login_ok("SESS1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    login_call().respond_with(login_ok("SESS2")).expect(1).mount(&server).await;
    logout_call().respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    pdf_call()
        .and(header("cookie", "PHPSESSID=SESS2; Path=/;"))
        .respond_with(pdf_ok())
        .expect(1)
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    assert_eq!(tefi.authenticate(false).await?, "SESS1");

    tefi.clear_session().await;
    assert!(!tefi.is_authenticated().await);
    assert!(tefi.session_token().await.is_none());

    assert_eq!(tefi.generate_pdf("42", "7").await?, PDF_BYTES);
    assert_eq!(tefi.session_token().await.as_deref(), Some("SESS2"));

    let logins = requests_to(&server, REST_PATH)
        .await?
        .into_iter()
        .filter(|r| rpc_method(r).as_deref() == Some("login"))
        .count();
    assert_eq!(logins, 2);
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_when_remote_succeeds() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS123")).mount(&server).await;
    logout_call()
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    tefi.authenticate(false).await?;
    tefi.logout().await;
    assert!(!tefi.is_authenticated().await);

    let logout = requests_to(&server, REST_PATH)
        .await?
        .into_iter()
        .find(|r| rpc_method(r).as_deref() == Some("logout"))
        .expect("logout request");
    assert_eq!(rest_data(&logout)?["session"], "SESS123");
    Ok(())
}

#[tokio::test]
async fn logout_clears_session_when_remote_fails() -> Result<()> {
    let server = MockServer::start().await;
    login_call().respond_with(login_ok("SESS123")).mount(&server).await;
    logout_call()
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let tefi = tefi_service(&server)?;
    tefi.authenticate(false).await?;
    tefi.logout().await;
    assert!(!tefi.is_authenticated().await);
    assert!(tefi.session_token().await.is_none());
    Ok(())
}

#[tokio::test]
async fn logout_without_session_makes_no_call() -> Result<()> {
    let server = MockServer::start().await;
    logout_call().respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let tefi = tefi_service(&server)?;
    tefi.logout().await;
    assert!(!tefi.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn concurrent_callers_share_one_login() -> Result<()> {
    let server = MockServer::start().await;
    login_call()
        .respond_with(login_ok("SESS123").set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;
    pdf_call().respond_with(pdf_ok()).expect(3).mount(&server).await;

    let tefi: Arc<dyn PdfSource> = Arc::new(tefi_service(&server)?);
    let (a, b, c) = tokio::join!(
        tefi.generate_pdf("1", "7"),
        tefi.generate_pdf("2", "7"),
        tefi.generate_pdf("3", "7"),
    );

    for result in [a, b, c] {
        assert_eq!(result?, PDF_BYTES);
    }
    Ok(())
}
