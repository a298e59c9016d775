mod common;

use axum::http::StatusCode;

use common::{ALICE, BOB, Client, test_app};

#[tokio::test]
async fn dashboard_lists_only_own_payments() {
    let (app, _db) = test_app();
    let mut client = Client::new();

    let page = client.login(&app, ALICE).await;
    assert!(page.body.contains("Welcome back, Alice Johnson"));
    assert!(page.body.contains("Rent Payment - Landlord"));
    assert!(page.body.contains("$1250.00"));
    assert!(!page.body.contains("Mortgage Payment"));
    assert!(!page.body.contains("Company Payroll"));
}

#[tokio::test]
async fn search_is_scoped_to_current_user() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    // "monthly" also appears in bob's and admin's descriptions
    let page = client.get(&app, "/search?query=monthly").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Monthly rent for November"));
    assert!(page.body.contains("Monthly streaming service"));
    assert!(!page.body.contains("Home loan monthly payment"));
    assert!(!page.body.contains("Monthly salary distribution"));
}

#[tokio::test]
async fn search_treats_wildcards_and_quotes_literally() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, BOB).await;

    let page = client.get(&app, "/search?query=%25").await;
    assert!(page.body.contains("0 result(s)"));

    let page = client.get(&app, "/search?query=%27%20OR%20%271%27%3D%271").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("0 result(s)"));
    assert!(!page.body.contains("Monthly rent for November"));
}

#[tokio::test]
async fn search_echo_is_escaped() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    let page = client
        .get(&app, "/search?query=%3Cscript%3Ealert(1)%3C%2Fscript%3E")
        .await;
    assert!(!page.body.contains("<script>alert(1)</script>"));
    assert!(page.body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn empty_search_lists_every_own_payment() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    for uri in ["/search", "/search?query="] {
        let page = client.get(&app, uri).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("All payments (8)"));
        assert_eq!(page.body.matches("<tr><td>").count(), 8);
        assert!(page.body.contains("Rent Payment - Landlord"));
        assert!(page.body.contains("Spotify Premium"));
        assert!(!page.body.contains("Mortgage Payment"));
    }
}

#[tokio::test]
async fn status_shows_own_payment() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    let page = client.get(&app, "/status?id=6").await;
    assert!(page.body.contains("Payment #6"));
    assert!(page.body.contains("Amazon"));
    assert!(page.body.contains(r#"<dd class="status-pending">pending</dd>"#));
}

#[tokio::test]
async fn status_hides_other_users_payments() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    for id in ["9", "17", "999", "abc", "1 OR 1=1"] {
        let page = client
            .get(&app, &format!("/status?id={}", id.replace(' ', "+")))
            .await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Payment Not Found"), "id {id}");
        assert!(!page.body.contains("Mortgage Payment"));
    }
}

#[tokio::test]
async fn status_without_id_shows_form() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    let page = client.get(&app, "/status").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("Payment Not Found"));
}
