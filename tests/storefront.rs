//! End-to-end storefront scenarios against a mock backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wawidget_client::{ApiClient, Auth, PublicApi};
use wawidget_protocol::{ContactOption, OptionId, OptionType};
use wawidget_protocol::dummy::dummy_position;
use wawidget_render::{
    FormStatus, Icon, LinkOpener, OptionAction, Panel, PanelView, RenderError, WidgetSession,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    links: Mutex<Vec<String>>,
}

impl LinkOpener for Recorder {
    fn open(&self, url: &str) -> wawidget_render::Result<()> {
        self.links.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

fn public_api(server: &MockServer) -> PublicApi {
    PublicApi::new(ApiClient::new(server.uri(), Duration::from_secs(5), Auth::Public).unwrap())
}

fn widget_json() -> serde_json::Value {
    let mut sales = ContactOption::new(OptionId::Numeric(10), "Ventas", OptionType::Whatsapp);
    sales.mobile_phone = Some("573001234567".to_string());
    sales.predefined_message = Some("Hola, quiero información".to_string());

    let mut callback = ContactOption::new(OptionId::Numeric(11), "Te llamamos", OptionType::Virfon);
    callback.order = 1;
    callback.queue = Some(301);

    json!({
        "id": 5,
        "time_zone_id": 7,
        "button_title": "Contáctanos",
        "header_title": "¿Cómo te ayudamos?",
        "header_subtitle": "Respondemos en minutos",
        "button_color": "#25d366",
        "header_color": "#075e54",
        "position": dummy_position(),
        "options": [sales, callback],
    })
}

#[tokio::test]
async fn active_widget_full_visitor_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whats-app-widget/mitienda"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"active": true, "widget": widget_json()}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whats-app-widget/mitienda/call-me-back"))
        .and(body_json(json!({"number": "573001234567", "id": 11})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Solicitud registrada",
            "data": {"message": "Te llamaremos en breve"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let opener = Arc::new(Recorder::default());
    let mut session = WidgetSession::new(public_api(&server), "mitienda").with_opener(opener.clone());
    session.mount().await.unwrap();

    let view = session.view(1280).unwrap();
    assert_eq!(view.trigger.icon, Icon::WhatsApp);
    assert_eq!(view.trigger.style.get("background-color"), Some("#25d366"));
    assert_eq!(view.trigger.style.get("bottom"), Some("20px"));
    assert!(view.modal.is_none());

    session.toggle_modal().unwrap();
    let modal = session.view(1280).unwrap().modal.unwrap();
    let PanelView::Options(rows) = modal.content else {
        panic!("expected the option list");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Ventas");

    let action = session.select_option(&OptionId::Numeric(10)).unwrap();
    let OptionAction::OpenLink(url) = action else {
        panic!("expected a deep link");
    };
    assert!(url.contains("phone=573001234567"));
    assert!(url.contains("text=Hola%2C%20quiero%20informaci%C3%B3n"));
    assert_eq!(opener.links.lock().unwrap().as_slice(), [url]);

    let action = session.select_option(&OptionId::Numeric(11)).unwrap();
    assert_eq!(action, OptionAction::ShowCallbackForm);
    assert_eq!(session.panel(), Panel::CallbackForm);

    session.form_mut().set_name("Ana María");
    session.form_mut().set_phone("+57 300 123 4567");
    let message = session.submit_callback().await.unwrap();
    assert_eq!(message, "Te llamaremos en breve");
    assert_eq!(session.form().message(), Some("Te llamaremos en breve"));
    assert!(!session.form().can_submit());

    tokio::time::pause();
    session.expire_message().await;
    assert_eq!(session.form().message(), None);
    assert_eq!(session.form().status(), &FormStatus::Editing);
    assert_eq!(session.form().name(), "");
}

#[tokio::test]
async fn inactive_widget_renders_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whats-app-widget/cerrada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"active": false, "widget": widget_json()}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = WidgetSession::new(public_api(&server), "cerrada");
    session.mount().await.unwrap();

    assert!(!session.is_visible());
    assert!(session.view(1280).is_none());
    assert!(matches!(session.toggle_modal(), Err(RenderError::Hidden)));
    assert!(matches!(
        session.select_option(&OptionId::Numeric(10)),
        Err(RenderError::Hidden)
    ));
    assert!(session.submit_callback().await.is_err());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn widget_without_options_is_hidden() {
    let server = MockServer::start().await;
    let mut widget = widget_json();
    widget["options"] = json!([]);
    Mock::given(method("GET"))
        .and(path("/whats-app-widget/vacia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"active": true, "widget": widget}
        })))
        .mount(&server)
        .await;

    let mut session = WidgetSession::new(public_api(&server), "vacia");
    session.mount().await.unwrap();
    assert!(!session.is_visible());
}

#[tokio::test]
async fn backend_failure_hides_widget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut session = WidgetSession::new(public_api(&server), "mitienda");
    session.mount().await.unwrap();
    assert!(!session.is_visible());
}

#[tokio::test]
async fn callback_failure_message_is_displayed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whats-app-widget/mitienda"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"active": true, "widget": widget_json()}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whats-app-widget/mitienda/call-me-back"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"message": "Fuera de horario"}
        })))
        .mount(&server)
        .await;

    let mut session = WidgetSession::new(public_api(&server), "mitienda");
    session.mount().await.unwrap();
    session.select_option(&OptionId::Numeric(11)).unwrap();
    session.form_mut().set_name("Ana");
    session.form_mut().set_phone("3001234567");

    let message = session.submit_callback().await.unwrap();
    assert_eq!(message, "Fuera de horario");
    assert_eq!(session.form().message(), Some("Fuera de horario"));
}
