mod common;

use axum::http::StatusCode;

use common::{ALICE, BOB, Client, test_app};

#[tokio::test]
async fn board_shows_seeded_feedback() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    let page = client.get(&app, "/feedback").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Could you add CSV export for payment history?"));
}

#[tokio::test]
async fn submitted_markup_is_stored_verbatim_and_rendered_inert() {
    let (app, db) = test_app();
    let mut client = Client::new();
    client.login(&app, BOB).await;

    let payload = r#"<img src=x onerror="alert('pwned')">"#;
    let page = client.post(&app, "/feedback", &[("message", payload)]).await;
    page.assert_redirect("/feedback");

    let stored = db.recent_feedback(1).unwrap();
    assert_eq!(stored[0].message, payload);
    assert_eq!(stored[0].username, "bob");

    // Another user views the board
    let mut viewer = Client::new();
    viewer.login(&app, ALICE).await;
    let page = viewer.get(&app, "/feedback").await;
    assert!(!page.body.contains("<img src=x"));
    assert!(page.body.contains("&lt;img src=x onerror=&quot;alert(&#x27;pwned&#x27;)&quot;&gt;"));
}

#[tokio::test]
async fn thanks_flash_after_submit() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    client
        .post(&app, "/feedback", &[("message", "Great app")])
        .await
        .assert_redirect("/feedback");

    let page = client.get(&app, "/feedback").await;
    assert!(page.body.contains("Thank you for your feedback!"));
    assert!(page.body.contains("Great app"));
}

#[tokio::test]
async fn blank_feedback_is_refused() {
    let (app, db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    client
        .post(&app, "/feedback", &[("message", "   ")])
        .await
        .assert_redirect("/feedback");

    let page = client.get(&app, "/feedback").await;
    assert!(page.body.contains("Feedback cannot be empty"));
    assert_eq!(db.recent_feedback(50).unwrap().len(), 2);
}

#[tokio::test]
async fn newest_feedback_first() {
    let (app, _db) = test_app();
    let mut client = Client::new();
    client.login(&app, ALICE).await;

    client.post(&app, "/feedback", &[("message", "first of mine")]).await;
    client.post(&app, "/feedback", &[("message", "second of mine")]).await;

    let page = client.get(&app, "/feedback").await;
    let first = page.body.find("first of mine").unwrap();
    let second = page.body.find("second of mine").unwrap();
    assert!(second < first);
}
