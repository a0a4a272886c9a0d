mod common;

use bandwatch::DashError;
use bandwatch::api::{LoginRequest, Method, StatementKind, UserId};
use common::{ScriptedTransport, client, session_json, target};
use serde_json::json;

fn login(client: &mut bandwatch::ApiClient<ScriptedTransport>) {
    client
        .login(&LoginRequest {
            username: "ada".to_owned(),
            password: "secret1".to_owned(),
        })
        .expect("login");
}

#[test]
fn login_stores_session_and_attaches_bearer() {
    let transport = ScriptedTransport::new()
        .respond(200, session_json("tok-1", "ref-1"))
        .respond(200, json!({ "symbol": "AAPL", "price_series": [] }));
    let mut client = client(transport);

    login(&mut client);
    assert_eq!(
        client.session().map(|s| s.user.id.clone()),
        Some(UserId::Number(7))
    );
    let summary = client.summary("AAPL").expect("summary");
    assert_eq!(summary.symbol, "AAPL");

    let requests = client.transport().requests();
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(target(&requests[0]), "/login");
    assert_eq!(requests[0].bearer, None);
    assert_eq!(
        requests[0].body,
        Some(json!({ "username": "ada", "password": "secret1" }))
    );
    assert_eq!(target(&requests[1]), "/summary?symbol=AAPL");
    assert_eq!(requests[1].bearer.as_deref(), Some("tok-1"));
}

#[test]
fn unauthorized_response_refreshes_once_and_retries() {
    let transport = ScriptedTransport::new()
        .respond(200, session_json("stale", "ref-1"))
        .respond(401, json!({ "error": "token expired" }))
        .respond(200, session_json("fresh", "ref-2"))
        .respond(200, json!(["AAPL", "MSFT"]));
    let mut client = client(transport);
    login(&mut client);

    let tickers = client.tickers(Some(&UserId::Number(7))).expect("tickers");
    assert_eq!(tickers, vec!["AAPL", "MSFT"]);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(target(&requests[1]), "/tickers?user_id=7");
    assert_eq!(requests[1].bearer.as_deref(), Some("stale"));
    assert_eq!(target(&requests[2]), "/refresh_token");
    assert_eq!(requests[2].body, Some(json!({ "refreshToken": "ref-1" })));
    assert_eq!(target(&requests[3]), "/tickers?user_id=7");
    assert_eq!(requests[3].bearer.as_deref(), Some("fresh"));
    assert_eq!(client.session().map(|s| s.refresh_token.as_str()), Some("ref-2"));
}

#[test]
fn failed_refresh_logs_out() {
    let transport = ScriptedTransport::new()
        .respond(200, session_json("stale", "ref-1"))
        .respond(401, json!({}))
        .respond(401, json!({ "error": "refresh token revoked" }));
    let mut client = client(transport);
    login(&mut client);

    let err = client.summary("AAPL").expect_err("unauthorized");
    assert_eq!(err, DashError::Unauthorized);
    assert!(err.is_unauthorized());
    assert!(client.session().is_none());
    assert_eq!(client.transport().requests().len(), 3);
}

#[test]
fn second_unauthorized_after_refresh_logs_out_without_looping() {
    let transport = ScriptedTransport::new()
        .respond(200, session_json("stale", "ref-1"))
        .respond(401, json!({}))
        .respond(200, session_json("fresh", "ref-2"))
        .respond(401, json!({}));
    let mut client = client(transport);
    login(&mut client);

    assert_eq!(client.world_markets(false), Err(DashError::Unauthorized));
    assert!(client.session().is_none());
    assert_eq!(client.transport().requests().len(), 4);
}

#[test]
fn anonymous_unauthorized_is_reported_without_refresh() {
    let transport = ScriptedTransport::new().respond(401, json!({ "error": "login required" }));
    let mut client = client(transport);

    let err = client.option_price_ratio().expect_err("401");
    assert_eq!(
        err,
        DashError::Http {
            status: 401,
            message: "login required".to_owned()
        }
    );
    assert_eq!(client.transport().requests().len(), 1);
}

#[test]
fn error_field_is_preferred_over_status_text() {
    let transport = ScriptedTransport::new()
        .respond(404, json!({ "error": "Ticker not found" }))
        .respond(500, json!({ "detail": "boom" }));
    let mut client = client(transport);

    let err = client.summary("ZZZZ").expect_err("404");
    assert_eq!(err.display_message(), "Ticker not found");

    let err = client.peers("ZZZZ").expect_err("500");
    assert_eq!(
        err,
        DashError::Http {
            status: 500,
            message: "Internal Server Error".to_owned()
        }
    );
}

#[test]
fn transport_failure_maps_to_generic_message() {
    let transport = ScriptedTransport::new().fail("connection refused");
    let mut client = client(transport);

    let err = client.fundamentals("AAPL").expect_err("transport");
    assert!(matches!(err, DashError::Transport(_)));
    assert_eq!(
        err.display_message(),
        "Unable to reach the server. Please try again."
    );
}

#[test]
fn malformed_json_is_a_decode_error() {
    let transport = ScriptedTransport::new().respond(200, json!("not a summary"));
    let mut client = client(transport);
    assert!(matches!(client.summary("AAPL"), Err(DashError::Decode(_))));
}

#[test]
fn endpoint_paths_encode_symbols() {
    let transport = ScriptedTransport::new()
        .respond(200, json!({}))
        .respond(200, json!({}))
        .respond(200, json!({}))
        .respond(200, json!({}))
        .respond(200, json!({}))
        .respond(200, json!({ "logo_url": "https://logos.test/brk.png" }));
    let mut client = client(transport);

    client.summary_overview("^GSPC").expect("overview");
    client.peer_averages("BRK.B").expect("peer averages");
    client
        .financials(StatementKind::BalanceSheet, "MSFT")
        .expect("financials");
    client.world_markets(true).expect("world markets");
    client.opening_range_breakout("SPY").expect("orb");
    let logo = client.ticker_logo("BRK.B").expect("logo");

    assert_eq!(
        client.transport().paths(),
        vec![
            "/summary/overview?symbol=%5EGSPC",
            "/summary/peer-averages?symbol=BRK.B",
            "/financials/balance_sheet/MSFT",
            "/world-markets?refresh=1",
            "/opening_range_breakout?ticker=SPY",
            "/tickers/BRK.B/logo",
        ]
    );
    assert_eq!(logo.url.as_deref(), Some("https://logos.test/brk.png"));
}

#[test]
fn watchlist_mutations_send_user_and_ticker() {
    let transport = ScriptedTransport::new()
        .respond(200, session_json("tok", "ref"))
        .respond(201, json!({ "ok": true }))
        .respond(200, json!({ "ok": true }));
    let mut client = client(transport);
    login(&mut client);

    let user = UserId::Number(7);
    client.add_ticker(&user, "NVDA").expect("add");
    client.remove_ticker(&user, "NVDA").expect("remove");

    let requests = client.transport().requests();
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].body, Some(json!({ "user_id": 7, "ticker": "NVDA" })));
    assert_eq!(requests[2].method, Method::Delete);
    assert_eq!(target(&requests[2]), "/tickers");
}

#[test]
fn backtest_returns_raw_payload() {
    let transport =
        ScriptedTransport::new().respond(200, json!({ "ticker": "AAPL", "trades": [1, 2] }));
    let mut client = client(transport);
    let body = client.backtest("AAPL").expect("backtest");
    assert_eq!(body["trades"], json!([1, 2]));
    assert_eq!(client.transport().paths(), vec!["/backtest?ticker=AAPL"]);
}

#[test]
fn symbols_are_escaped_in_queries_and_path_segments() {
    let transport = ScriptedTransport::new()
        .respond(200, json!({ "symbol": "EURUSD=X", "price_series": [] }))
        .respond(200, json!({}))
        .respond(200, json!({ "logo_url": "" }));
    let mut client = client(transport);

    client.summary("EURUSD=X&x=1").expect("summary");
    client
        .financials(StatementKind::CashFlow, "AB/C")
        .expect("financials");
    let logo = client.ticker_logo("BRK B").expect("logo");

    assert_eq!(
        client.transport().paths(),
        vec![
            "/summary?symbol=EURUSD%3DX%26x%3D1",
            "/financials/cash_flow/AB%2FC",
            "/tickers/BRK%20B/logo",
        ]
    );
    assert_eq!(logo.url, None);
}
