use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Connection settings for one ServiceNow instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub instance_url: Url,
    pub username: String,
    pub password: String,
    pub push_changes: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    fn new(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let instance_str = instance.into();
        // add http(s) prefix if not present
        let base_url =
            if instance_str.starts_with("http://") || instance_str.starts_with("https://") {
                instance_str
            } else {
                format!("https://{instance_str}")
            };
        let mut instance_url = Url::parse(&base_url)?;
        // normalize with trailing slash so joins stay relative to the instance root
        if !instance_url.path().ends_with('/') {
            instance_url.set_path(&format!("{}/", instance_url.path()));
        }

        Ok(Self {
            instance_url,
            username: username.into(),
            password: password.into(),
            push_changes: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        })
    }

    pub fn build(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder::new(instance, username, password)
    }
}

pub struct ClientConfigBuilder {
    instance: String,
    username: String,
    password: String,
    push_changes: bool,
    timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfigBuilder {
    fn new(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            instance: instance.into(),
            username: username.into(),
            password: password.into(),
            push_changes: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Whether POST/PUT/DELETE requests are transmitted. GET is always allowed.
    pub fn with_push_changes(mut self, enabled: bool) -> Self {
        self.push_changes = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::new(self.instance, self.username, self.password)?;
        config.push_changes = self.push_changes;
        config.timeout = self.timeout;
        config.connect_timeout = self.connect_timeout;
        Ok(config)
    }
}
