use std::io::Read;
use std::net::TcpListener;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use autolight::{
    ClockCorrection, DeviceClient, DeviceClientConfig, DeviceError, LightState,
    LightStateController, RgbColor, RgbPins, Schedule, SyncError, correct_device_clock,
};
use chrono::{Local, NaiveDateTime};
use tiny_http::{Header, Method, Response, Server, StatusCode};

struct MockDeviceState {
    light: Mutex<LightState>,
    raw_updates: Mutex<Vec<String>>,
    time_sets: Mutex<Vec<String>>,
    ntp_body: Mutex<String>,
    reject_updates: AtomicBool,
    garbage_reads: AtomicBool,
}

struct MockDevice {
    base_url: String,
    state: Arc<MockDeviceState>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl MockDevice {
    fn start(initial: LightState) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind mock device");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let base_url = format!("http://{addr}");

        let state = Arc::new(MockDeviceState {
            light: Mutex::new(initial),
            raw_updates: Mutex::new(Vec::new()),
            time_sets: Mutex::new(Vec::new()),
            ntp_body: Mutex::new(
                r#"{ "status": "ACTIVE", "local_time": "2026-08-04T10:00:00" }"#.to_string(),
            ),
            reject_updates: AtomicBool::new(false),
            garbage_reads: AtomicBool::new(false),
        });
        let stop = Arc::new(AtomicBool::new(false));
        let state_for_thread = Arc::clone(&state);
        let stop_for_thread = Arc::clone(&stop);
        let join = thread::spawn(move || {
            while !stop_for_thread.load(Ordering::Relaxed) {
                match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(request)) => handle_request(request, &state_for_thread),
                    Ok(None) => continue,
                    Err(_) => continue,
                }
            }
        });

        Self {
            base_url,
            state,
            stop,
            join: Some(join),
        }
    }

    fn client(&self) -> DeviceClient {
        DeviceClient::new(DeviceClientConfig::new(self.base_url.as_str())).expect("client builds")
    }

    fn set_ntp_body(&self, body: &str) {
        *self.state.ntp_body.lock().expect("ntp lock") = body.to_string();
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn handle_request(mut request: tiny_http::Request, state: &Arc<MockDeviceState>) {
    let method = request.method().clone();
    let path = request.url().to_string();
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    match (method, path.as_str()) {
        (Method::Get, "/rgbLightState") => {
            if state.garbage_reads.load(Ordering::Relaxed) {
                send_text(request, StatusCode(200), "not-json");
                return;
            }
            let light = state.light.lock().expect("light lock").clone();
            send_json(request, StatusCode(200), &light);
        }
        (Method::Post, "/rgbLightState") => {
            state
                .raw_updates
                .lock()
                .expect("raw lock")
                .push(body.clone());
            if state.reject_updates.load(Ordering::Relaxed) {
                send_text(request, StatusCode(400), "invalid schedule");
                return;
            }
            match serde_json::from_str::<LightState>(&body) {
                Ok(new_state) => {
                    *state.light.lock().expect("light lock") = new_state.clone();
                    send_json(request, StatusCode(200), &new_state);
                }
                Err(_) => send_text(request, StatusCode(400), "invalid body"),
            }
        }
        (Method::Get, "/ntpStatus") => {
            let ntp = state.ntp_body.lock().expect("ntp lock").clone();
            send_raw_json(request, StatusCode(200), &ntp);
        }
        (Method::Post, "/time") => {
            state.time_sets.lock().expect("time lock").push(body);
            send_raw_json(request, StatusCode(200), "{}");
        }
        _ => send_text(request, StatusCode(404), "not found"),
    }
}

fn send_json<T: serde::Serialize>(request: tiny_http::Request, status: StatusCode, body: &T) {
    let payload = serde_json::to_vec(body).expect("serializable payload");
    let _ = request.respond(
        Response::from_data(payload)
            .with_status_code(status)
            .with_header(json_content_type()),
    );
}

fn send_raw_json(request: tiny_http::Request, status: StatusCode, body: &str) {
    let _ = request.respond(
        Response::from_string(body.to_string())
            .with_status_code(status)
            .with_header(json_content_type()),
    );
}

fn send_text(request: tiny_http::Request, status: StatusCode, body: &str) {
    let _ = request.respond(Response::from_string(body.to_string()).with_status_code(status));
}

fn json_content_type() -> Header {
    Header::from_str("Content-Type: application/json; charset=utf-8").expect("valid header")
}

fn initial_state() -> LightState {
    LightState {
        pins: RgbPins {
            r_pin: 1,
            g_pin: 2,
            b_pin: 3,
        },
        color: RgbColor { r: 0, g: 0, b: 0 },
        schedules: Vec::new(),
    }
}

#[test]
fn reads_the_device_light_state() {
    let device = MockDevice::start(initial_state());
    let state = device.client().read_light_state().expect("read succeeds");
    assert_eq!(state, initial_state());
}

#[test]
fn load_add_save_transmits_one_identifier_free_schedule() {
    let device = MockDevice::start(initial_state());
    let controller = LightStateController::new(Box::new(device.client()));

    let added = Schedule {
        start: 1_000,
        end: 2_000,
        color: RgbColor { r: 255, g: 0, b: 0 },
        days_active: Vec::new(),
    };

    controller.load().expect("load succeeds");
    controller.mutate(|draft| {
        draft.schedules.add(added.clone());
    });
    let echoed = controller.save().expect("save succeeds");
    assert_eq!(echoed.schedules, vec![added.clone()]);

    let stored = device.state.light.lock().expect("light lock").clone();
    assert_eq!(stored.schedules, vec![added]);

    let raw_updates = device.state.raw_updates.lock().expect("raw lock");
    assert_eq!(raw_updates.len(), 1);
    let payload = serde_json::from_str::<serde_json::Value>(&raw_updates[0]).expect("json body");
    let schedules = payload["schedules"].as_array().expect("schedules array");
    assert_eq!(schedules.len(), 1);
    let mut keys = schedules[0]
        .as_object()
        .expect("schedule object")
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, vec!["color", "daysActive", "end", "start"]);
}

#[test]
fn rejected_update_maps_to_validation_and_keeps_the_draft() {
    let device = MockDevice::start(initial_state());
    let controller = LightStateController::new(Box::new(device.client()));

    controller.load().expect("load succeeds");
    controller.mutate(|draft| draft.color = RgbColor { r: 7, g: 8, b: 9 });
    let before = controller.snapshot();

    device.state.reject_updates.store(true, Ordering::Relaxed);
    let err = controller.save().expect_err("save fails");
    assert!(matches!(
        err,
        SyncError::Device(DeviceError::Validation(_))
    ));
    assert_eq!(controller.snapshot(), before);
}

#[test]
fn malformed_read_body_maps_to_decode() {
    let device = MockDevice::start(initial_state());
    device.state.garbage_reads.store(true, Ordering::Relaxed);

    let err = device.client().read_light_state().expect_err("read fails");
    assert!(matches!(err, DeviceError::Decode(_)));
}

#[test]
fn unreachable_device_maps_to_network() {
    // Grab a free port and close it again so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);

    let client =
        DeviceClient::new(DeviceClientConfig::new(format!("http://{addr}"))).expect("client builds");
    let err = client.read_light_state().expect_err("read fails");
    assert!(matches!(err, DeviceError::Network(_)));
}

#[test]
fn active_ntp_skips_clock_correction() {
    let device = MockDevice::start(initial_state());
    let outcome = correct_device_clock(&device.client()).expect("status read succeeds");
    assert_eq!(outcome, ClockCorrection::NtpActive);
    assert!(device.state.time_sets.lock().expect("time lock").is_empty());
}

#[test]
fn in_sync_clock_without_ntp_is_left_alone() {
    let device = MockDevice::start(initial_state());
    let now = Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    device.set_ntp_body(&format!(
        r#"{{ "status": "INACTIVE", "local_time": "{now}" }}"#
    ));

    let outcome = correct_device_clock(&device.client()).expect("status read succeeds");
    assert_eq!(outcome, ClockCorrection::InSync);
    assert!(device.state.time_sets.lock().expect("time lock").is_empty());
}

#[test]
fn drifted_clock_without_ntp_gets_corrected() {
    let device = MockDevice::start(initial_state());
    device.set_ntp_body(r#"{ "status": "INACTIVE", "local_time": "2000-01-01T00:00:00" }"#);

    let outcome = correct_device_clock(&device.client()).expect("correction succeeds");
    assert_eq!(outcome, ClockCorrection::Corrected);

    let time_sets = device.state.time_sets.lock().expect("time lock");
    assert_eq!(time_sets.len(), 1);
    let payload = serde_json::from_str::<serde_json::Value>(&time_sets[0]).expect("json body");
    let local_time = payload["local_time"].as_str().expect("local_time string");
    NaiveDateTime::parse_from_str(local_time, "%Y-%m-%dT%H:%M:%S").expect("editable format");
}
