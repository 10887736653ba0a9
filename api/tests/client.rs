use reqwest::{IntoUrl, RequestBuilder};

#[derive(Clone, Debug)]
pub struct TestClient {
    pub base: String,
    pub client: reqwest::Client,
}

impl TestClient {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put_absolute(&self, url: impl IntoUrl) -> RequestBuilder {
        self.client.put(url)
    }
}
