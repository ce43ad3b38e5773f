mod common;

use std::sync::Arc;

use chrono::Utc;
use common::test_authenticator;
use common::TestDb;
use common::JWT_SECRET;
use todo_service::domain::session::errors::SessionError;
use todo_service::domain::session::models::AccessScope;
use todo_service::domain::session::models::Session;
use todo_service::domain::session::models::SessionToken;
use todo_service::domain::session::ports::SessionServicePort;
use todo_service::domain::session::service::SessionService;
use todo_service::domain::todo::models::Todo;
use todo_service::domain::todo::models::TodoId;
use todo_service::domain::todo::models::TodoText;
use todo_service::domain::todo::models::UpdateTodoCommand;
use todo_service::domain::todo::ports::TodoRepository;
use todo_service::domain::user::errors::UserError;
use todo_service::domain::user::models::EmailAddress;
use todo_service::domain::user::models::User;
use todo_service::domain::user::models::UserId;
use todo_service::domain::user::ports::UserRepository;
use todo_service::outbound::repositories::PostgresTodoRepository;
use todo_service::outbound::repositories::PostgresUserRepository;

fn user(email: &str) -> User {
    User {
        id: UserId::new(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "$argon2id$test_hash".to_string(),
        sessions: Vec::new(),
        created_at: Utc::now(),
    }
}

fn session(token: &str) -> Session {
    Session::new(AccessScope::Auth, SessionToken::new(token.to_string()))
}

fn todo(owner: UserId, text: &str) -> Todo {
    Todo {
        id: TodoId::new(),
        owner,
        text: TodoText::new(text.to_string()).unwrap(),
        completed: false,
        completed_at: None,
        created_at: Utc::now(),
    }
}

async fn seeded_users(db: &TestDb) -> (Arc<PostgresUserRepository>, UserId) {
    let repository = Arc::new(PostgresUserRepository::new(db.pool.clone()));
    let stored = repository
        .create(user("a@x.com"))
        .await
        .expect("Failed to seed user");
    (repository, stored.id)
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;

    let result = repository.create(user("A@X.com")).await;
    assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

    let existing = repository.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(existing.email.as_str(), "a@x.com");
}

#[tokio::test]
async fn test_add_session_to_missing_user_is_not_found() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let repository = PostgresUserRepository::new(db.pool.clone());

    let result = repository.add_session(&UserId::new(), &session("t")).await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_session_set_keeps_order_and_removes_exact_entry() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;

    for token in ["one", "two", "three"] {
        repository.add_session(&user_id, &session(token)).await.unwrap();
    }

    repository.remove_session(&user_id, &session("two")).await.unwrap();
    repository.remove_session(&user_id, &session("two")).await.unwrap();
    repository
        .remove_session(&UserId::new(), &session("one"))
        .await
        .unwrap();

    let found = repository.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(found.sessions, vec![session("one"), session("three")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_session_appends_all_survive() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .add_session(&user_id, &session(&format!("token-{}", i)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let found = repository.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(found.sessions.len(), 16);
}

#[tokio::test]
async fn test_retain_latest_sessions_spares_current() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;

    for token in ["one", "two", "three", "four"] {
        repository.add_session(&user_id, &session(token)).await.unwrap();
    }

    repository
        .retain_latest_sessions(&user_id, 2, &session("two"))
        .await
        .unwrap();

    let found = repository.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(
        found.sessions,
        vec![session("two"), session("three"), session("four")]
    );

    repository
        .retain_latest_sessions(&user_id, 2, &session("four"))
        .await
        .unwrap();

    let found = repository.find_by_id(&user_id).await.unwrap().unwrap();
    assert_eq!(found.sessions, vec![session("three"), session("four")]);
}

#[tokio::test]
async fn test_find_by_email_skips_sessions() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;
    repository.add_session(&user_id, &session("one")).await.unwrap();

    let email = EmailAddress::new("a@x.com".to_string()).unwrap();
    let found = repository.find_by_email(&email).await.unwrap().unwrap();

    assert_eq!(found.id, user_id);
    assert!(found.sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_concurrent_issues_all_remain_valid() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let (repository, user_id) = seeded_users(&db).await;
    let sessions = Arc::new(SessionService::new(
        Arc::clone(&repository),
        test_authenticator(JWT_SECRET),
        24,
        Some(3),
    ));

    let oldest = sessions.issue(&user_id, AccessScope::Auth).await.unwrap();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let sessions = Arc::clone(&sessions);
            tokio::spawn(async move { sessions.issue(&user_id, AccessScope::Auth).await })
        })
        .collect();

    let mut issued = Vec::new();
    for handle in handles {
        issued.push(handle.await.unwrap().unwrap());
    }

    for token in &issued {
        assert!(sessions.verify(token.as_str()).await.is_ok());
    }
    let result = sessions.verify(oldest.as_str()).await;
    assert!(matches!(result, Err(SessionError::RevokedOrUnknownToken)));

    sessions
        .revoke(&user_id, &Session::new(AccessScope::Auth, issued[0].clone()))
        .await
        .unwrap();
    let result = sessions.verify(issued[0].as_str()).await;
    assert!(matches!(result, Err(SessionError::RevokedOrUnknownToken)));
    assert!(sessions.verify(issued[1].as_str()).await.is_ok());
}

#[tokio::test]
async fn test_todo_queries_are_owner_scoped() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());
    let owner = users.create(user("owner@x.com")).await.unwrap().id;
    let intruder = users.create(user("intruder@x.com")).await.unwrap().id;
    let todos = PostgresTodoRepository::new(db.pool.clone());

    let created = todos.create(todo(owner, "mine")).await.unwrap();
    let changes = UpdateTodoCommand {
        completed: Some(true),
        ..Default::default()
    }
    .into_changes(Utc::now());

    assert!(todos
        .find_by_id_and_owner(&created.id, &intruder)
        .await
        .unwrap()
        .is_none());
    assert!(todos
        .update_by_id_and_owner(&created.id, &intruder, changes.clone())
        .await
        .unwrap()
        .is_none());
    assert!(todos
        .delete_by_id_and_owner(&created.id, &intruder)
        .await
        .unwrap()
        .is_none());
    assert!(todos.find_by_owner(&intruder).await.unwrap().is_empty());

    let untouched = todos
        .find_by_id_and_owner(&created.id, &owner)
        .await
        .unwrap()
        .unwrap();
    assert!(!untouched.completed);

    let updated = todos
        .update_by_id_and_owner(&created.id, &owner, changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.text.as_str(), "mine");
    assert!(updated.completed);
    assert!(updated.completed_at.is_some());

    let deleted = todos
        .delete_by_id_and_owner(&created.id, &owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(todos.find_by_owner(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_todo_listing_keeps_creation_order() {
    let Some(db) = TestDb::try_new().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());
    let owner = users.create(user("owner@x.com")).await.unwrap().id;
    let todos = PostgresTodoRepository::new(db.pool.clone());

    for text in ["first", "second", "third"] {
        todos.create(todo(owner, text)).await.unwrap();
    }

    let texts: Vec<_> = todos
        .find_by_owner(&owner)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.text.as_str().to_string())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}
