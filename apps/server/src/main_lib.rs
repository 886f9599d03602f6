use std::sync::Arc;

use crate::{
    auth::{hash_password, resolve_secret_key, AuthConfig, AuthManager},
    config::Config,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use geocast_core::{
    campaigns::{CampaignService, CampaignServiceTrait},
    customers::{CustomerService, CustomerServiceTrait},
    engagement::{EngagementService, EngagementServiceTrait},
    notifications::{NotificationService, NotificationServiceTrait},
    stats::{StatsService, StatsServiceTrait},
    users::{UserService, UserServiceTrait},
    utils::{Clock, ReportingCalendar, SystemClock},
    wallet::{WalletService, WalletServiceTrait},
};
use geocast_storage_sqlite::{
    db::{self, write_actor},
    CampaignRepository, CustomerRepository, EngagementRepository, NotificationRepository,
    UserRepository, WalletRepository,
};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub customer_service: Arc<dyn CustomerServiceTrait>,
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub campaign_service: Arc<dyn CampaignServiceTrait>,
    pub engagement_service: Arc<dyn EngagementServiceTrait>,
    pub stats_service: Arc<dyn StatsServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub tracking_fallback_url: String,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // try_init: repeated calls (tests) keep the first subscriber.
    let _ = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let calendar = ReportingCalendar::new(clock.clone(), config.timezone, config.age_reference_year);
    tracing::info!(
        "Reporting timezone {}, age reference year {}",
        config.timezone,
        calendar.reference_year()
    );

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repository));

    let customer_repository = Arc::new(CustomerRepository::new(pool.clone(), writer.clone()));
    let customer_service: Arc<dyn CustomerServiceTrait> = Arc::new(CustomerService::new(
        customer_repository.clone(),
        calendar.clone(),
    ));

    let wallet_repository = Arc::new(WalletRepository::new(pool.clone(), writer.clone()));
    let wallet_service: Arc<dyn WalletServiceTrait> =
        Arc::new(WalletService::new(wallet_repository, clock.clone()));

    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));
    let notification_service: Arc<dyn NotificationServiceTrait> =
        Arc::new(NotificationService::new(notification_repository));

    let campaign_repository = Arc::new(CampaignRepository::new(pool.clone(), writer.clone()));
    let campaign_service: Arc<dyn CampaignServiceTrait> = Arc::new(CampaignService::new(
        campaign_repository.clone(),
        customer_service.clone(),
        notification_service.clone(),
        calendar.clone(),
    ));

    let engagement_repository = Arc::new(EngagementRepository::new(pool.clone(), writer.clone()));
    let engagement_service: Arc<dyn EngagementServiceTrait> = Arc::new(EngagementService::new(
        engagement_repository.clone(),
        customer_repository,
        clock,
    ));

    let stats_service: Arc<dyn StatsServiceTrait> = Arc::new(StatsService::new(
        campaign_repository,
        engagement_repository,
        calendar,
    ));

    if let Some(admin) = &config.admin {
        let password_hash = hash_password(&admin.password)?;
        let user = user_service
            .ensure_admin(&admin.email, password_hash)
            .await?;
        tracing::info!("Administrator account ready: {}", user.email);
    }

    let jwt_secret = resolve_secret_key(config.jwt_secret.as_deref())?;
    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret,
        session_ttl: config.session_ttl,
        cookie_name: config.session_cookie.clone(),
    }));

    Ok(Arc::new(AppState {
        user_service,
        customer_service,
        wallet_service,
        campaign_service,
        engagement_service,
        stats_service,
        notification_service,
        auth,
        tracking_fallback_url: config.tracking_fallback_url.clone(),
    }))
}
