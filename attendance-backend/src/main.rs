// attendance-backend/src/main.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use attendance_backend::api::{create_router, AppState};
use attendance_backend::config::Config;
use attendance_backend::db::create_db_pool;
use attendance_backend::repository::attendance_repository::AttendanceRepository;
use attendance_backend::repository::hierarchy_repository::HierarchyRepository;
use attendance_backend::repository::role_repository::RoleRepository;
use attendance_backend::repository::user_repository::UserRepository;
use attendance_backend::service::attendance_service::AttendanceService;
use attendance_backend::service::auth_service::AuthService;
use attendance_backend::service::hierarchy_service::HierarchyService;
use attendance_backend::service::import_service::{ImportConfig, ImportService};
use attendance_backend::service::reminder_service::{ReminderDispatcher, ReminderService};
use attendance_backend::service::user_service::UserService;
use attendance_backend::utils::email::EmailService;
use attendance_backend::utils::jwt::JwtManager;
use attendance_backend::utils::password::PasswordPolicy;
use attendance_backend::utils::whatsapp::WhatsAppService;
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Attendance Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // マイグレーションを適用
    Migrator::up(&db_pool, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied.");

    // リポジトリ
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
    let hierarchy_repo = Arc::new(HierarchyRepository::new(db_pool.clone()));
    let attendance_repo = Arc::new(AttendanceRepository::new(db_pool.clone()));

    // 認証まわり
    let jwt_manager = Arc::new(JwtManager::from_env().expect("Failed to configure JWT"));
    let password_policy = PasswordPolicy::from_env();

    // 通知トランスポート
    let email_service =
        Arc::new(EmailService::from_env().expect("Failed to configure email transport"));
    let whatsapp_service =
        Arc::new(WhatsAppService::from_env().expect("Failed to configure WhatsApp transport"));
    let dispatcher = ReminderDispatcher::new(
        email_service,
        whatsapp_service,
        Duration::from_secs(10),
    );

    // サービス
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        role_repo.clone(),
        jwt_manager.clone(),
        password_policy.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        role_repo.clone(),
        password_policy,
    ));
    let hierarchy_service = Arc::new(HierarchyService::new(
        db_pool.clone(),
        hierarchy_repo.clone(),
    ));
    let attendance_service = Arc::new(AttendanceService::new(
        hierarchy_repo.clone(),
        attendance_repo.clone(),
    ));
    let reminder_service = Arc::new(ReminderService::new(
        user_repo,
        attendance_repo,
        hierarchy_repo,
        dispatcher,
    ));
    let import_service = Arc::new(ImportService::new(
        db_pool,
        role_repo,
        ImportConfig::from_env(),
    ));

    let app_state = AppState {
        auth_service,
        user_service,
        hierarchy_service,
        attendance_service,
        reminder_service,
        import_service,
        jwt_manager,
    };

    // ルーターの設定
    let app_router = create_router(app_state);

    // サーバーの起動
    tracing::info!("Router configured. Server listening on {}", app_config.server_addr);

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
