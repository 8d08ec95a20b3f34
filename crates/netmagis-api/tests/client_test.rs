#![allow(clippy::unwrap_used)]
// Integration tests for `Client` using wiremock.
//
// One mock server plays both the CAS login service (`/cas/login`) and the
// Netmagis application (`/netmagis/...`).

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netmagis_api::{AuthError, Client, Error, HostOptions, TransportConfig};

const TOKEN: &str = "e1s1-4fe3a9";
const SESSION_COOKIE: &str = "NETMAGIS=4b8e21";

// ── Helpers ─────────────────────────────────────────────────────────

fn login_page() -> String {
    format!(
        r#"<html><body><form id="fm1" method="post">
<input id="username" name="username" type="text" value=""/>
<input id="password" name="password" type="password" value=""/>
<input type="hidden" name="execution" value="{TOKEN}"/>
<input type="hidden" name="_eventId" value="submit"/>
</form></body></html>"#
    )
}

fn app_page(content: &str) -> String {
    format!("<html><head><title>Netmagis</title></head><body>{content}</body></html>")
}

fn error_page(message: &str) -> String {
    app_page(&format!(
        r##"<h2>Error!</h2><blockquote><FONT COLOR="#FF0000">"{message}"</FONT></blockquote>"##
    ))
}

fn search_page(rows: &[(&str, &str)]) -> String {
    let cells: String = rows
        .iter()
        .map(|(l, v)| {
            format!(r#"<tr><td class="tab-text10">{l}</td><td class="tab-text10">{v}</td></tr>"#)
        })
        .collect();
    app_page(&format!(
        "<p>www.example.com is a host in view default</p><table>{cells}</table>"
    ))
}

const EDIT_FORM: &str = r#"<form method="post" action="/netmagis/mod">
<input type="hidden" name="action" value="store">
<input type="hidden" name="idrr" value="7781">
<input type="text" name="name" value="www">
<input type="text" name="domain" value="example.com">
<input type="text" name="ttl" value="">
<input type="checkbox" name="sendsmtp" value="1">
<select name="iddhcpprof"><option value="0">No profile</option></select>
</form>"#;

async fn mount_cas(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/cas/login?service=netmagis", server.uri()),
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cas/login"))
        .and(body_string_contains(format!("execution={TOKEN}")))
        .and(body_string_contains("_eventId=submit"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/netmagis/callback?ticket=ST-1", server.uri()),
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/netmagis/callback"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", format!("{SESSION_COOKIE}; Path=/"))
                .set_body_string(app_page("welcome")),
        )
        .mount(server)
        .await;
}

fn base_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/netmagis", server.uri())).unwrap()
}

async fn connect(server: &MockServer, password: &str) -> Result<Client, Error> {
    let secret = SecretString::from(password.to_owned());
    Client::connect(
        base_url(server),
        "jdoe",
        &secret,
        &TransportConfig::default(),
    )
    .await
}

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    mount_cas(&server).await;
    let client = connect(&server, "s3cret").await.unwrap();
    (server, client)
}

async fn posted_bodies(server: &MockServer, to: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == to)
        .map(|r| String::from_utf8(r.body).unwrap())
        .collect()
}

// ── Handshake ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_stores_session_cookie() {
    let (server, client) = setup().await;
    let cookie = client.session_cookies();
    assert_eq!(cookie.as_deref(), Some(SESSION_COOKIE));
}

#[tokio::test]
async fn test_connect_without_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page("hello")))
        .mount(&server)
        .await;

    let result = connect(&server, "s3cret").await;
    assert!(
        matches!(
            result,
            Err(Error::Authentication(AuthError::NoRedirect { status: 200 }))
        ),
        "expected NoRedirect, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connect_login_page_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/cas/login", server.uri()),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = connect(&server, "s3cret").await;
    assert!(
        matches!(
            result,
            Err(Error::Authentication(AuthError::LoginPageUnreachable { status: 503 }))
        ),
        "expected LoginPageUnreachable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connect_without_execution_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(ResponseTemplate::new(301).insert_header(
            "Location",
            format!("{}/cas/login", server.uri()),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form></form>"))
        .mount(&server)
        .await;

    let result = connect(&server, "s3cret").await;
    assert!(
        matches!(result, Err(Error::Authentication(AuthError::TokenNotFound))),
        "expected TokenNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connect_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cas/login"))
        .and(body_string_contains("password=wrong"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            "<div id=\"msg\" class=\"errors\"><span>Authentication attempt has failed, likely due \
             to invalid credentials. Please verify and try again. </span></div>",
        ))
        .mount(&server)
        .await;
    mount_cas(&server).await;

    let result = connect(&server, "wrong").await;
    assert!(
        matches!(
            result,
            Err(Error::Authentication(AuthError::InvalidCredentials))
        ),
        "expected InvalidCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connect_follows_relative_locations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/cas/login?service=netmagis"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cas/login"))
        .and(body_string_contains(format!("execution={TOKEN}")))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/netmagis/callback?ticket=ST-9"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/netmagis/callback"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", format!("{SESSION_COOKIE}; Path=/"))
                .set_body_string(app_page("welcome")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server, "s3cret").await.unwrap();
    assert_eq!(client.session_cookies().as_deref(), Some(SESSION_COOKIE));
}

/// Start redirect and login page of a CAS whose credential POST is `answer`.
async fn mount_cas_answering(server: &MockServer, answer: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/netmagis/start"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/cas/login", server.uri()),
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cas/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cas/login"))
        .respond_with(answer)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_connect_without_callback_location() {
    let server = MockServer::start().await;
    mount_cas_answering(
        &server,
        ResponseTemplate::new(200).set_body_string("<html><body>Log In Successful</body></html>"),
    )
    .await;

    let result = connect(&server, "s3cret").await;
    assert!(
        matches!(result, Err(Error::Authentication(AuthError::MissingCallback))),
        "expected MissingCallback, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connect_callback_unreachable() {
    let server = MockServer::start().await;
    // Nothing listens on the discard port.
    mount_cas_answering(
        &server,
        ResponseTemplate::new(302)
            .insert_header("Location", "http://127.0.0.1:9/netmagis/callback?ticket=ST-1"),
    )
    .await;

    let result = connect(&server, "s3cret").await;
    assert!(
        matches!(
            result,
            Err(Error::Authentication(AuthError::CallbackFailed { .. }))
        ),
        "expected CallbackFailed, got: {result:?}"
    );
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_decodes_results_table() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .and(body_string_contains("q=www.example.com"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[
            ("Name", "www.example.com"),
            ("IP address", "192.0.2.10"),
            ("Comment", "front web server"),
            ("SMTP emit right", "No"),
            ("DHCP profile", "No profile"),
            ("Aliases", "web.example.com"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let record = client.search("www.example.com").await.unwrap().unwrap();

    assert_eq!(record.name, "www");
    assert_eq!(record.domain, "example.com");
    assert_eq!(record.ip_address, Some("192.0.2.10".parse().unwrap()));
    assert_eq!(record.comment.as_deref(), Some("front web server"));
    assert_eq!(record.dhcp_profile, None);
    assert_eq!(record.aliases, vec!["web.example.com"]);
    assert!(!record.smtp_allowed);
    assert!(!record.is_alias);
}

#[tokio::test]
async fn test_search_through_alias() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(search_page(&[("Name", "www.example.com")])),
        )
        .mount(&server)
        .await;

    let record = client.search("web.example.com").await.unwrap().unwrap();
    assert!(record.is_alias);
    assert_eq!(record.fqdn(), "www.example.com");
}

#[tokio::test]
async fn test_search_not_found() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page(
            "<p>String 'ghost.example.com' not found</p>",
        )))
        .mount(&server)
        .await;

    let result = client.search("ghost.example.com").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_search_rejects_invalid_identifier_before_network() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.search("not a host!").await;
    assert!(
        matches!(result, Err(Error::InvalidIdentifier { .. })),
        "expected InvalidIdentifier, got: {result:?}"
    );
}

#[tokio::test]
async fn test_search_unrecognised_markup() {
    let (server, mut client) = setup().await;
    let body = app_page("<p>Scheduled maintenance</p>");

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let err = client.search("192.0.2.10").await.unwrap_err();
    assert_eq!(err.raw_body(), Some(body.as_str()));
}

// ── Edit form ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_answer_without_markup_is_parse_error() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("www.example.com is a host in view default"),
        )
        .mount(&server)
        .await;

    let result = client.search("www.example.com").await;
    assert!(
        matches!(result, Err(Error::Parse { .. })),
        "expected Parse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_call_with_custom_predicate() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/net"))
        .and(body_string_contains("plage=192.0.2.0%2F24"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page("Network map")))
        .expect(1)
        .mount(&server)
        .await;

    let body = client
        .call("/net", &[("plage", "192.0.2.0/24".to_owned())], |_, b| {
            b.contains("Network map")
        })
        .await
        .unwrap();
    assert!(body.contains("Network map"));
}

#[tokio::test]
async fn test_get_host_for_edit() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .and(body_string_contains("action=edit"))
        .and(body_string_contains("name=www"))
        .and(body_string_contains("domain=example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page(EDIT_FORM)))
        .mount(&server)
        .await;

    let form = client
        .get_host_for_edit("www.example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(form.record_id(), Some("7781"));
    assert_eq!(form.get("sendsmtp"), Some("0"));
    assert_eq!(form.get("iddhcpprof"), Some("0"));
    assert_eq!(form.get("action"), None);
}

#[tokio::test]
async fn test_get_host_for_edit_missing_name_is_none() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(error_page("Name 'ghost' does not exist")),
        )
        .mount(&server)
        .await;

    let result = client.get_host_for_edit("ghost.example.com").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_get_host_for_edit_other_rejection_is_error() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(error_page("You don't have rights on domain 'example.com'")),
        )
        .mount(&server)
        .await;

    let result = client.get_host_for_edit("www.example.com").await;
    match result {
        Err(Error::ServerRejected { ref message }) => {
            assert_eq!(message, "You don't have rights on domain 'example.com'");
        }
        other => panic!("expected ServerRejected, got: {other:?}"),
    }
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_host_omits_smtp_when_not_allowed() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(error_page("Name 'new' does not exist")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/netmagis/add"))
        .and(body_string_contains("action=add-host"))
        .and(body_string_contains("addr=192.0.2.20"))
        .and(body_string_contains("hinfo=PC%2FUnix"))
        .and(body_string_contains("iddhcpprof=0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(app_page("<p>Host has been added.</p>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_host(
            "new.example.com",
            "192.0.2.20".parse().unwrap(),
            &HostOptions::default(),
            false,
        )
        .await
        .unwrap();

    let bodies = posted_bodies(&server, "/netmagis/add").await;
    assert_eq!(bodies.len(), 1);
    assert!(!bodies[0].contains("sendsmtp"), "body: {}", bodies[0]);
}

#[tokio::test]
async fn test_create_host_sends_smtp_when_allowed() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/add"))
        .and(body_string_contains("sendsmtp=1"))
        .and(body_string_contains("ttl=300"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(app_page("<p>Host has been added.</p>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = HostOptions {
        smtp_allowed: true,
        ttl: Some(300),
        ..HostOptions::default()
    };
    // `allow_multiple` skips the existence lookup entirely.
    client
        .create_host("mx.example.com", "192.0.2.25".parse().unwrap(), &options, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_host_refuses_duplicate_without_write() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page(EDIT_FORM)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/netmagis/add"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .create_host(
            "www.example.com",
            "192.0.2.11".parse().unwrap(),
            &HostOptions::default(),
            false,
        )
        .await;
    assert!(
        matches!(result, Err(Error::DuplicateHost { ref fqdn }) if fqdn == "www.example.com"),
        "expected DuplicateHost, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_host_without_confirmation_is_unexpected() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/add"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page("<p>Done?</p>")))
        .mount(&server)
        .await;

    let result = client
        .create_host(
            "new.example.com",
            "192.0.2.20".parse().unwrap(),
            &HostOptions::default(),
            true,
        )
        .await;
    assert!(
        matches!(result, Err(Error::UnexpectedResponse { .. })),
        "expected UnexpectedResponse, got: {result:?}"
    );
}

// ── Update / delete / alias ─────────────────────────────────────────

#[tokio::test]
async fn test_update_host() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .and(body_string_contains("action=store"))
        .and(body_string_contains("idrr=7781"))
        .and(body_string_contains("comment=moved"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page(
            "<p>The modification has been stored in database.</p>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let options = HostOptions {
        comment: Some("moved".into()),
        ..HostOptions::default()
    };
    client
        .update_host("www.example.com", "7781", &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_host_server_rejected() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/mod"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(error_page("Invalid MAC address 'zz'")),
        )
        .mount(&server)
        .await;

    let options = HostOptions {
        mac: Some("zz".into()),
        ..HostOptions::default()
    };
    let result = client.update_host("www.example.com", "7781", &options).await;
    match result {
        Err(Error::ServerRejected { ref message }) => {
            assert_eq!(message, "Invalid MAC address 'zz'");
        }
        other => panic!("expected ServerRejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_host() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/del"))
        .and(body_string_contains("idviews=1"))
        .and(body_string_contains("name=old"))
        .respond_with(ResponseTemplate::new(200).set_body_string(app_page(
            "<p>Host 'old.example.com' has been removed.</p>",
        )))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_host("old.example.com").await.unwrap();
}

#[tokio::test]
async fn test_create_alias() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/netmagis/add"))
        .and(body_string_contains("action=add-alias"))
        .and(body_string_contains("name=web"))
        .and(body_string_contains("nameref=www"))
        .and(body_string_contains("domainref=example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(app_page("<p>The alias has been added.</p>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_alias("web.example.com", "www.example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_operations_refuse_bare_names() {
    let (_server, mut client) = setup().await;

    let result = client.delete_host("localhost").await;
    assert!(
        matches!(result, Err(Error::InvalidFqdn { .. })),
        "expected InvalidFqdn, got: {result:?}"
    );
}
