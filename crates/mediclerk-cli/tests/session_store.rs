use mediclerk_api::session::Session;
use mediclerk_cli::session_store::{clear_session, load_session, save_session, session_path};
use mediclerk_core::models::user::UserProfile;

fn session() -> Session {
    Session {
        access_token: "jwt-abc".into(),
        user: UserProfile {
            email: Some("ade@example.com".into()),
            first_name: Some("Ade".into()),
            last_name: None,
        },
    }
}

#[test]
fn session_round_trips_and_clears() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load_session(dir.path()).unwrap(), None);

    save_session(dir.path(), &session()).unwrap();
    assert_eq!(load_session(dir.path()).unwrap(), Some(session()));

    clear_session(dir.path()).unwrap();
    assert_eq!(load_session(dir.path()).unwrap(), None);
    clear_session(dir.path()).unwrap();
}

#[test]
fn corrupt_or_tokenless_session_reads_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(session_path(dir.path()), "{not json").unwrap();
    assert_eq!(load_session(dir.path()).unwrap(), None);

    std::fs::write(session_path(dir.path()), r#"{"access_token": ""}"#).unwrap();
    assert_eq!(load_session(dir.path()).unwrap(), None);
}
