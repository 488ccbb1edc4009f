//! Tests for the HTTP client against an in-process fake game server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

use goban_client::api::protocol::GAME_CONNECT;
use goban_client::{
    ApiErrorKind, Coord, GameApi, HttpGameApi, MoveRequest, OpponentMode, PlacedStone, StoneColor,
};

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.requests.lock().expect("recorder lock").push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.requests.lock().expect("recorder lock").clone()
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("session=S1"))
}

async fn refresh() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "session=S1; Path=/")],
        Json(json!({ "message": "S1" })),
    )
}

async fn color(headers: HeaderMap) -> impl IntoResponse {
    if has_session(&headers) {
        (StatusCode::OK, Json(json!({ "message": "b" })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no session" })))
    }
}

async fn winner() -> Json<Value> {
    Json(json!({ "message": "x" }))
}

async fn board() -> Json<Value> {
    Json(json!([{ "x": 3, "y": 4, "c": "b" }, { "x": 0, "y": 1, "c": "w" }]))
}

async fn create(Json(body): Json<Value>) -> StatusCode {
    match body["message"].as_str() {
        Some("S2") => StatusCode::OK,
        Some("S3") => StatusCode::CREATED,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn make_move(State(recorder): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    recorder.push(format!("make_move {} {}", body["x"], body["y"]));
    StatusCode::OK
}

async fn make_move_ai(State(recorder): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    recorder.push(format!("make_move_ai {} {}", body["x"], body["y"]));
    StatusCode::OK
}

async fn spawn_server(recorder: Recorder) -> String {
    let router = Router::new()
        .route("/session/refresh", post(refresh))
        .route("/game/color", get(color))
        .route("/game/winner", get(winner))
        .route("/game/board", get(board))
        .route("/game/create", post(create))
        .route("/game/create_ai_opponent", post(|| async { StatusCode::OK }))
        .route("/game/make_move", post(make_move))
        .route("/game/make_move_ai", post(make_move_ai))
        .with_state(recorder);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpGameApi {
    HttpGameApi::new(base_url, Duration::from_secs(5)).expect("Failed to build client")
}

#[tokio::test]
async fn test_session_cookie_is_kept_and_sent() {
    let base = spawn_server(Recorder::default()).await;
    let api = client(&base);

    // Without a session the server refuses.
    let err = api.fetch_color().await.expect_err("should need a session");
    assert_eq!(err.status(), Some(401));

    assert_eq!(api.refresh_session().await.expect("refresh"), "S1");
    assert_eq!(api.fetch_color().await.expect("color"), StoneColor::Black);

    let connect = api.endpoint(GAME_CONNECT).expect("endpoint");
    let cookie = api.cookie_header(&connect).expect("cookie for realtime");
    assert!(cookie.contains("session=S1"));
}

#[tokio::test]
async fn test_fetch_board_snapshot() {
    let base = spawn_server(Recorder::default()).await;
    let stones = client(&base).fetch_board().await.expect("board");
    assert_eq!(
        stones,
        vec![
            PlacedStone::new(3, 4, StoneColor::Black),
            PlacedStone::new(0, 1, StoneColor::White),
        ]
    );
}

#[tokio::test]
async fn test_join_needs_exact_200() {
    let base = spawn_server(Recorder::default()).await;
    let api = client(&base);

    api.join_session("S2").await.expect("join should succeed");

    let created = api.join_session("S3").await.expect_err("201 is a rejection");
    assert_eq!(created.status(), Some(201));

    let missing = api.join_session("nobody").await.expect_err("404 is a rejection");
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn test_ai_opponent_request() {
    let base = spawn_server(Recorder::default()).await;
    client(&base)
        .create_ai_opponent()
        .await
        .expect("AI request");
}

#[tokio::test]
async fn test_moves_route_by_opponent_mode() {
    let recorder = Recorder::default();
    let base = spawn_server(recorder.clone()).await;
    let api = client(&base);
    let coord = Coord::new(3, 4).expect("on board");

    api.make_move(MoveRequest::new(coord, OpponentMode::Human))
        .await
        .expect("human move");
    api.make_move(MoveRequest::new(coord, OpponentMode::Ai))
        .await
        .expect("AI move");

    assert_eq!(recorder.entries(), ["make_move 3 4", "make_move_ai 3 4"]);
}

#[tokio::test]
async fn test_bad_color_code_is_decode_error() {
    let base = spawn_server(Recorder::default()).await;
    let err = client(&base).fetch_winner().await.expect_err("x is no color");
    assert!(matches!(err.kind, ApiErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .refresh_session()
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err.kind, ApiErrorKind::Transport(_)));
}
