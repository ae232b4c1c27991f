use quillpress_core::db::open_db_in_memory;
use quillpress_core::{
    NewPost, NewUser, PostService, PostServiceError, PostUpdate, SqlitePostRepository,
    SqliteUserRepository, UserService, UserServiceError, UserSummary,
};

#[test]
fn register_then_publish_then_read_back_the_aggregate() {
    let mut conn = open_db_in_memory().unwrap();

    let created = {
        let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
        service
            .register_user(&NewUser {
                username: "alice".to_string(),
                password: "pw".to_string(),
                name: Some("Alice".to_string()),
                location: Some("NY".to_string()),
            })
            .unwrap()
            .expect("fresh username should register")
    };
    assert_eq!(created.id, 1);
    assert_eq!(created.username, "alice");
    assert_eq!(created.password, "pw");
    assert_eq!(created.name.as_deref(), Some("Alice"));
    assert_eq!(created.location.as_deref(), Some("NY"));

    let mut service = PostService::new(SqlitePostRepository::try_new(&mut conn).unwrap());
    let published = service
        .publish_post(&NewPost {
            author_id: 1,
            title: "Hello".to_string(),
            content: "World".to_string(),
            tags: vec!["#intro".to_string()],
        })
        .unwrap();

    let detail = service.get_post(1).unwrap();
    assert_eq!(detail, published);
    assert_eq!(detail.id, 1);
    assert_eq!(detail.title, "Hello");
    assert_eq!(detail.content, "World");
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].id, 1);
    assert_eq!(detail.tags[0].name, "#intro");
    assert_eq!(
        detail.author,
        UserSummary {
            id: 1,
            username: "alice".to_string(),
            name: Some("Alice".to_string()),
            location: Some("NY".to_string()),
        }
    );
}

#[test]
fn reconciliation_scenario_shrinks_the_tag_set() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
        service
            .register_user(&NewUser {
                username: "alice".to_string(),
                password: "pw".to_string(),
                name: None,
                location: None,
            })
            .unwrap()
            .unwrap();
    }

    let mut service = PostService::new(SqlitePostRepository::try_new(&mut conn).unwrap());
    service
        .publish_post(&NewPost {
            author_id: 1,
            title: "Post".to_string(),
            content: "Body".to_string(),
            tags: vec!["#a".to_string(), "#b".to_string()],
        })
        .unwrap();

    service
        .update_post(
            1,
            &PostUpdate {
                tags: Some(vec!["#a".to_string()]),
                ..PostUpdate::default()
            },
        )
        .unwrap();

    let detail = service.get_post(1).unwrap();
    let tag_names: Vec<&str> = detail.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(tag_names, vec!["#a"]);
}

#[test]
fn service_rejects_blank_registration_and_tag_input() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
        let err = service
            .register_user(&NewUser {
                username: "   ".to_string(),
                password: "pw".to_string(),
                name: None,
                location: None,
            })
            .unwrap_err();
        assert!(matches!(err, UserServiceError::BlankUsername));

        service
            .register_user(&NewUser {
                username: "alice".to_string(),
                password: "pw".to_string(),
                name: None,
                location: None,
            })
            .unwrap()
            .unwrap();
    }

    let mut service = PostService::new(SqlitePostRepository::try_new(&mut conn).unwrap());
    let err = service
        .publish_post(&NewPost {
            author_id: 1,
            title: "Post".to_string(),
            content: "Body".to_string(),
            tags: vec![" ".to_string()],
        })
        .unwrap_err();
    assert!(matches!(err, PostServiceError::InvalidTag(_)));

    // Nothing was written: no post row, no tag row.
    drop(service);
    let post_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM posts;", [], |row| row.get(0))
        .unwrap();
    let tag_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(post_count, 0);
    assert_eq!(tag_count, 0);
}

#[test]
fn service_maps_missing_posts_to_post_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::try_new(&mut conn).unwrap());

    let err = service.get_post(4242).unwrap_err();
    assert!(matches!(err, PostServiceError::PostNotFound(4242)));
}
