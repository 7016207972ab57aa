use std::path::PathBuf;

#[allow(dead_code)]
pub struct FsTestConfig {
    base_path: PathBuf,
}

#[allow(dead_code)] //remove this when this issue will be fixed: https://github.com/rust-lang/rust/issues/46379
impl FsTestConfig {
    pub fn new() -> Self {
        let base_path = {
            let uuid = uuid::Uuid::new_v4().hyphenated().to_string();
            let mut tmp = std::env::temp_dir();
            tmp.push("elvanto_api_integration_tests");
            tmp.push(uuid);
            tmp
        };
        Self { base_path }
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        let mut p = self.base_path.clone();
        p.push(file_name);
        p
    }

    pub async fn write(&self, file_name: &str, content: &str) -> PathBuf {
        tokio::fs::create_dir_all(&self.base_path).await.unwrap();
        let path = self.file_path(file_name);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }
}

impl Drop for FsTestConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base_path);
    }
}
