#[cfg(test)]
pub mod test_utils {
    use crate::config::{build_app_state_with_uploader, AppConfig};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::uploader::{PosterFile, PosterUploader, UploadError};
    use async_trait::async_trait;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_JWT_SECRET: &str = "integration-test-secret";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .expect("Failed to enable foreign keys");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Poster uploader that never leaves the process. Uploaded posters are
    /// "hosted" at `https://images.example.com/<file name>`.
    #[derive(Debug, Default)]
    pub struct FakeUploader {
        uploads: AtomicUsize,
        fail_next: AtomicBool,
    }

    impl FakeUploader {
        pub fn uploads(&self) -> usize {
            self.uploads.load(Ordering::SeqCst)
        }

        /// Makes the next upload fail as if the image host rejected it.
        pub fn fail_next(&self) {
            self.fail_next.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PosterUploader for FakeUploader {
        async fn upload(&self, poster: PosterFile) -> Result<String, UploadError> {
            poster.check()?;
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(UploadError::Rejected {
                    status: 500,
                    body: "simulated failure".to_string(),
                });
            }
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://images.example.com/{}", poster.file_name))
        }
    }

    /// Create AppState for testing: SeaORM repositories over an in-memory
    /// database, a cheap bcrypt cost and the fake uploader.
    pub async fn setup_test_app_state_with(uploader: Arc<FakeUploader>) -> AppState {
        let db = setup_test_db().await;
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::with_secret(TEST_JWT_SECRET)
        };

        build_app_state_with_uploader(db, &config, uploader)
    }

    pub async fn setup_test_app_state() -> AppState {
        setup_test_app_state_with(Arc::new(FakeUploader::default())).await
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from `RUST_LOG`, defaulting to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }
}
