use crate::api_state::AppState;
use crate::build_rocket;
use crate::models::config::Config;
use crate::models::error::{AdminError, Result};
use crate::repo::sqlite::{setup_test_db, Db};
use crate::service::auth::seed_default_user;
use crate::service::launcher::{JobHandle, JobLauncher};
use crate::service::progress::FileProgressSource;
use chrono::Utc;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Counts launches instead of spawning anything.
#[derive(Default)]
pub struct RecordingLauncher {
    launches: AtomicUsize,
    fail: bool,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl JobLauncher for RecordingLauncher {
    fn launch(&self) -> Result<JobHandle> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AdminError::JobLaunch {
                program: "python3 backup.py".to_string(),
                cause: io::Error::new(io::ErrorKind::NotFound, "interpreter not found"),
            });
        }
        Ok(JobHandle {
            id: Uuid::new_v4(),
            pid: None,
            started_at: Utc::now(),
        })
    }
}

/// A fully built Rocket over a throwaway database with one seeded admin.
pub struct TestApp {
    pub client: Client,
    pub db: Db,
    pub launcher: Arc<RecordingLauncher>,
    pub progress_file: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_launcher(RecordingLauncher::default())
    }

    pub fn with_launcher(launcher: RecordingLauncher) -> Self {
        let (db, dir) = setup_test_db();
        seed_default_user(&db, TEST_USERNAME, TEST_PASSWORD).unwrap();

        let progress_file = dir.path().join("progress.txt");
        let launcher = Arc::new(launcher);
        let state = AppState::new(
            db.clone(),
            Arc::new(FileProgressSource::new(&progress_file)),
            launcher.clone(),
        );

        let config = Config {
            progress_file: progress_file.to_str().unwrap().to_string(),
            ..Config::default()
        };
        let client =
            Client::tracked(build_rocket(&config, state)).expect("valid rocket instance");

        Self {
            client,
            db,
            launcher,
            progress_file,
            _dir: dir,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> LocalResponse<'_> {
        self.client
            .post("/?act=login")
            .header(ContentType::Form)
            .body(format!("username={}&password={}", username, password))
            .dispatch()
    }

    pub fn login_as_admin(&self) {
        let response = self.login(TEST_USERNAME, TEST_PASSWORD);
        assert_eq!(response.status(), Status::SeeOther);
    }
}
