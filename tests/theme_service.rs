//! Theme and seed behaviour against a real PostgreSQL.
//!
//! Run with `cargo test --features integration` (needs Docker).
#![cfg(feature = "integration")]

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use vcard_rs::config::JwtConfig;
use vcard_rs::error::{AppError, AppResult};
use vcard_rs::external::{ImageConverter, ImageCrateConverter};
use vcard_rs::models::{
    LogoFormat, MAX_THEME_NAME_LEN, NewTheme, ThemeColor, ThemeDisplay, UserRole,
};
use vcard_rs::repositories::{ThemeRepository, UserRepository};
use vcard_rs::services::{
    AdminAccount, DEFAULT_THEME_ID, DEFAULT_THEME_NAME, Seeder, ThemeService, UserService,
};

use common::{TestDb, bring_up_postgres, fast_password_config};

/// Records the requested height and returns fixed renditions.
#[derive(Default)]
struct RecordingConverter {
    heights: Mutex<Vec<u32>>,
}

#[async_trait]
impl ImageConverter for RecordingConverter {
    async fn convert(&self, _image: Vec<u8>, height: u32) -> AppResult<LogoFormat> {
        self.heights.lock().unwrap().push(height);
        Ok(LogoFormat {
            png: "data:image/png;base64,AAAA".to_string(),
            webp: "data:image/webp;base64,BBBB".to_string(),
        })
    }
}

fn theme_service(db: &TestDb, converter: Arc<dyn ImageConverter>) -> ThemeService {
    ThemeService::new(ThemeRepository::new(db.pool.clone()), converter)
}

async fn insert(db: &TestDb, theme_id: &str, name: &str) {
    ThemeRepository::new(db.pool.clone())
        .create(NewTheme::with_theme_id(theme_id, name).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pagination_over_25_themes() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    for i in 1..=25 {
        service.create_theme(&format!("Theme {:02}", i)).await.unwrap();
    }

    let page = service
        .get_themes_by_page_limit_and_search_query(2, 10, "")
        .await
        .unwrap();
    assert_eq!(page.themes.len(), 10);
    assert_eq!(page.themes[0].name, "Theme 11");
    assert_eq!(page.total_themes, 25);
    assert_eq!(page.page.total_pages, 3);
    assert_eq!(page.page.next_page, Some(3));
    assert_eq!(page.page.prev_page, Some(1));

    let last = service
        .get_themes_by_page_limit_and_search_query(3, 10, "")
        .await
        .unwrap();
    assert_eq!(last.themes.len(), 5);
    assert_eq!(last.page.next_page, None);

    let beyond = service
        .get_themes_by_page_limit_and_search_query(9, 10, "")
        .await
        .unwrap();
    assert!(beyond.themes.is_empty());
    assert_eq!(beyond.total_themes, 25);
}

#[tokio::test]
async fn test_search_is_literal_and_case_insensitive() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    for (id, name) in [
        ("1", "a.b"),
        ("2", "axb"),
        ("3", "50% off"),
        ("4", "500 off"),
        ("5", "a_b"),
        ("6", "acb"),
        ("7", "Corporate Blue"),
    ] {
        insert(&db, id, name).await;
    }

    let names = |page: vcard_rs::services::ThemePage| {
        page.themes.into_iter().map(|t| t.name).collect::<Vec<_>>()
    };

    for (search, expected) in [
        ("a.b", vec!["a.b"]),
        ("50%", vec!["50% off"]),
        ("a_b", vec!["a_b"]),
        ("corporate", vec!["Corporate Blue"]),
    ] {
        let page = service
            .get_themes_by_page_limit_and_search_query(1, 10, search)
            .await
            .unwrap();
        assert_eq!(page.total_themes, expected.len() as i64, "search {:?}", search);
        assert_eq!(names(page), expected, "search {:?}", search);
    }

    let everything = service
        .get_themes_by_page_limit_and_search_query(1, 100, "")
        .await
        .unwrap();
    assert_eq!(everything.total_themes, 7);
    assert_eq!(everything.themes.len(), 7);
}

#[tokio::test]
async fn test_update_options_keeps_logo_format() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    insert(&db, "t1", "Acme").await;
    service
        .update_theme_logo_by_id("t1", vec![1, 2, 3], "30")
        .await
        .unwrap();

    let updated = service
        .update_theme_options_by_id(
            "t1",
            json!({
                "name": "Acme2",
                "logo": {
                    "size": { "height": 40 },
                    "format": { "png": "data:image/png;base64,ZZZZ", "webp": "" }
                }
            }),
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Acme2");
    assert_eq!(updated.logo.size.height, 40);
    assert_eq!(updated.logo.format.png, "data:image/png;base64,AAAA");
    assert_eq!(updated.logo.format.webp, "data:image/webp;base64,BBBB");

    let reloaded = service.get_theme_by_id("t1").await.unwrap();
    assert_eq!(reloaded.logo, updated.logo);
}

#[tokio::test]
async fn test_update_options_persists_color_and_display() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    insert(&db, "t1", "Acme").await;

    let updated = service
        .update_theme_options_by_id(
            "t1",
            json!({
                "color": {
                    "font": { "primary": "#000000", "secondary": " #111 " },
                    "background": "#ffffff",
                    "socialIcons": { "font": "#222222", "background": "#333333" },
                    "vCardBtn": { "font": "#444", "background": "#555" }
                },
                "display": { "sms": false, "map": false }
            }),
        )
        .await
        .unwrap();

    let reloaded = service.get_theme_by_id("t1").await.unwrap();
    for theme in [&updated, &reloaded] {
        assert_eq!(theme.name, "Acme");
        assert_eq!(theme.color.font.primary, "#000000");
        assert_eq!(theme.color.font.secondary, "#111");
        assert_eq!(theme.color.background, "#ffffff");
        assert_eq!(theme.color.social_icons.background, "#333333");
        assert_eq!(theme.color.v_card_btn.font, "#444");
        assert_eq!(
            theme.display,
            ThemeDisplay {
                sms: false,
                map: false,
                ..ThemeDisplay::default()
            }
        );
    }
}

#[tokio::test]
async fn test_update_options_rejects_invalid_color_and_long_name() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    insert(&db, "t1", "Acme").await;

    match service
        .update_theme_options_by_id(
            "t1",
            json!({ "name": "Renamed", "color": { "font": { "primary": "red" } } }),
        )
        .await
    {
        Err(AppError::ValidationErrors { errors }) => {
            assert!(
                errors.iter().any(|e| e.field == "color.font.primary"),
                "{:?}",
                errors
            );
        }
        other => panic!("Expected ValidationErrors, got {:?}", other.map(|t| t.name)),
    }

    match service
        .update_theme_options_by_id(
            "t1",
            json!({ "name": "x".repeat(MAX_THEME_NAME_LEN + 45) }),
        )
        .await
    {
        Err(AppError::ValidationErrors { errors }) => assert_eq!(errors[0].field, "name"),
        other => panic!("Expected ValidationErrors, got {:?}", other.map(|t| t.name)),
    }

    let unchanged = service.get_theme_by_id("t1").await.unwrap();
    assert_eq!(unchanged.name, "Acme");
    assert_eq!(unchanged.color, ThemeColor::default());
    assert_eq!(unchanged.display, ThemeDisplay::default());
}

#[tokio::test]
async fn test_update_options_rejects_operators_and_unknown_ids() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    insert(&db, "t1", "Acme").await;

    for payload in [
        json!({ "$where": "sleep(1000)" }),
        json!({ "logo": { "$where": "1" } }),
    ] {
        match service.update_theme_options_by_id("t1", payload).await {
            Err(AppError::BadRequest { message }) => {
                assert_eq!(message, "Invalid options provided.")
            }
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }
    assert_eq!(service.get_theme_by_id("t1").await.unwrap().name, "Acme");

    assert!(matches!(
        service
            .update_theme_options_by_id("missing", json!({ "name": "X" }))
            .await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_theme() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(RecordingConverter::default()));
    insert(&db, "t1", "Acme").await;

    assert!(service.delete_theme_by_id("nope").await.unwrap().is_none());

    let deleted = service.delete_theme_by_id("t1").await.unwrap().unwrap();
    assert_eq!(deleted.theme_id, "t1");
    assert!(service.delete_theme_by_id("t1").await.unwrap().is_none());
    assert!(matches!(
        service.get_theme_by_id("t1").await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_theme_id() {
    let db = bring_up_postgres().await.unwrap();
    insert(&db, "t1", "Acme").await;

    let result = ThemeRepository::new(db.pool.clone())
        .create(NewTheme::with_theme_id("t1", "Other").unwrap())
        .await;
    assert!(matches!(result, Err(AppError::Duplicate { .. })));
}

#[tokio::test]
async fn test_logo_upload() {
    let db = bring_up_postgres().await.unwrap();
    let converter = Arc::new(RecordingConverter::default());
    let service = theme_service(&db, converter.clone());
    insert(&db, "t1", "Acme").await;

    let theme = service
        .update_theme_logo_by_id("t1", vec![0xFF], "29.6")
        .await
        .unwrap();
    assert_eq!(theme.logo.format.png, "data:image/png;base64,AAAA");
    assert_eq!(*converter.heights.lock().unwrap(), vec![30]);

    for (theme_id, height) in [("t1", "0"), ("t1", "tall"), ("missing", "30")] {
        match service
            .update_theme_logo_by_id(theme_id, vec![0xFF], height)
            .await
        {
            Err(AppError::UnprocessableContent { message }) => {
                assert_eq!(message, "Error uploading theme image.")
            }
            other => panic!("Expected UnprocessableContent, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_logo_upload_with_real_image() {
    let db = bring_up_postgres().await.unwrap();
    let service = theme_service(&db, Arc::new(ImageCrateConverter::new()));
    insert(&db, "t1", "Acme").await;

    let mut png = Vec::new();
    image::DynamicImage::new_rgba8(200, 100)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let theme = service
        .update_theme_logo_by_id("t1", png, "30")
        .await
        .unwrap();
    assert!(theme.logo.format.png.starts_with("data:image/png;base64,"));
    assert!(theme.logo.format.webp.starts_with("data:image/webp;base64,"));
}

#[tokio::test]
async fn test_seed_replaces_everything() {
    let db = bring_up_postgres().await.unwrap();
    insert(&db, "old-1", "Old").await;
    insert(&db, "old-2", "Older").await;

    let seeder = Seeder::new(db.pool.clone(), fast_password_config());
    let admin = || AdminAccount {
        name: "Admin".to_string(),
        email: " Admin@Example.com ".to_string(),
        password: "correct-horse".to_string(),
    };

    let report = seeder.run(admin()).await.unwrap();
    assert_eq!(report.deleted_themes, 2);
    assert_eq!(report.deleted_users, 0);
    assert_eq!(report.theme.theme_id, DEFAULT_THEME_ID);
    assert_eq!(report.theme.name, DEFAULT_THEME_NAME);
    assert_eq!(report.admin.role, UserRole::Admin);
    assert_eq!(report.admin.email, "admin@example.com");
    assert_eq!(report.admin.theme_id.as_deref(), Some(DEFAULT_THEME_ID));
    assert!(report.admin.password.starts_with("$argon2id$"));

    // A second run wipes the first one's rows
    let report = seeder.run(admin()).await.unwrap();
    assert_eq!((report.deleted_themes, report.deleted_users), (1, 1));

    let users = UserService::new(UserRepository::new(db.pool.clone()), fast_password_config());
    let jwt = JwtConfig {
        secret: "integration_secret_key_0123456789abcdef".to_string(),
        ..Default::default()
    };
    let (user, access, refresh) = users
        .authenticate("admin@example.com", "correct-horse", &jwt)
        .await
        .unwrap();
    assert_eq!(user.uuid, report.admin.uuid);
    assert_ne!(access, refresh);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let db = bring_up_postgres().await.unwrap();
    let seeder = Seeder::new(db.pool.clone(), fast_password_config());
    seeder
        .run(AdminAccount {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "first-password".to_string(),
        })
        .await
        .unwrap();

    let users = UserService::new(UserRepository::new(db.pool.clone()), fast_password_config());
    let jwt = JwtConfig {
        secret: "integration_secret_key_0123456789abcdef".to_string(),
        ..Default::default()
    };

    let token = users
        .issue_reset_token("ADMIN@example.com", &jwt)
        .await
        .unwrap();
    users
        .reset_password(&token, "second-password", &jwt)
        .await
        .unwrap();

    assert!(matches!(
        users
            .authenticate("admin@example.com", "first-password", &jwt)
            .await,
        Err(AppError::Unauthorized { .. })
    ));
    assert!(
        users
            .authenticate("admin@example.com", "second-password", &jwt)
            .await
            .is_ok()
    );
}
