mod common;

use common::{connected_session, header, json_body, update, Tester};
use serde_json::json;
use shared::{Event, Model};

fn connected() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    connected_session(&app, &mut model);
    (app, model)
}

#[test]
fn reads_are_plain_gets() {
    let app = Tester::default();
    let mut model = Model::default();

    let mut effects = update(&app, &mut model, Event::SessionStarted);
    for path in ["/health", "/history"] {
        let request = effects.take_http(path);
        assert_eq!(request.operation.method, "GET");
        assert_eq!(request.operation.url, format!("http://localhost:5000{path}"));
        assert!(request.operation.body.is_empty());
        assert_eq!(header(&request.operation, "Content-Type"), None);
    }
}

#[test]
fn brightness_sends_device_fraction() {
    let (app, mut model) = connected();
    update(&app, &mut model, Event::BrightnessSliderMoved { percent: 40 });

    let mut effects = update(&app, &mut model, Event::SubmitRequested);
    let submit = effects.take_http("/grid");
    let mut effects = common::respond(&app, &mut model, submit, common::ok_ack());
    let brightness = effects.take_http("/brightness");

    assert_eq!(brightness.operation.method, "POST");
    assert_eq!(json_body(&brightness.operation), json!({"brightness": 0.4}));
}

#[test]
fn grid_body_is_eight_rows_of_eight() {
    let (app, mut model) = connected();

    let mut effects = update(&app, &mut model, Event::SubmitRequested);
    let submit = effects.take_http("/grid");
    let body = json_body(&submit.operation);

    let rows = body["grid"].as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.as_array().unwrap().len() == 8));
    assert_eq!(rows[0][0], json!({"r": 0, "g": 0, "b": 0}));
}

#[test]
fn configured_base_url_prefixes_every_endpoint() {
    let app = Tester::default();
    let mut model = Model::default();
    update(
        &app,
        &mut model,
        Event::Configure { api_url: "http://192.168.1.50:5000/api/".into() },
    );

    let effects = update(&app, &mut model, Event::SessionStarted);
    let mut urls = effects.urls();
    urls.sort();
    assert_eq!(
        urls,
        [
            "http://192.168.1.50:5000/api/health",
            "http://192.168.1.50:5000/api/history",
        ]
    );
}
