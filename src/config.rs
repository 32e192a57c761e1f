use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    // Backend-as-a-service handle. Neither value is validated here; a missing
    // one only shows up as failed backend calls.
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: Option<String>,
    pub backend_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),

            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            backend_timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where confirmation emails send the user back to.
    pub fn email_redirect_url(&self) -> String {
        format!("{}/", self.frontend_url.trim_end_matches('/'))
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:5173".into(),
            supabase_url: "http://backend.invalid".into(),
            supabase_anon_key: "anon-key".into(),
            supabase_jwt_secret: None,
            backend_timeout_secs: 5,
        }
    }
}
