//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - GET call authenticated by an API key header
///
#[macro_export]
macro_rules! http_get_key {
    ($self:ident, $url:ident) => {
        $self
            .client
            .clone()
            .get($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("accept", "application/json")
            .header("x-apikey", &$self.api_key)
            .send()
    };
}
