use micro_cgi_gateway::{Gateway, environment};
use micro_cgi_message::protocol::{Response, Stream};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

// HTTP_COOKIE='visits=3; theme=dark' REQUEST_METHOD=GET REQUEST_URI=/ cargo run --example cookie
fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut gateway = Gateway::default();
    let mut response = Response::default();
    response.set_header("Content-Type", "text/plain; charset=utf-8");

    match gateway.server_request(environment(), std::io::stdin().lock()) {
        Ok(request) => {
            let visits = request.cookie_param("visits").and_then(|visits| visits.parse::<u32>().ok()).unwrap_or(0) + 1;
            let theme = request.cookie_param("theme").unwrap_or("light").to_owned();

            response.set_added_header("Set-Cookie", format!("visits={visits}; Path=/"));
            response.set_added_header("Set-Cookie", format!("theme={theme}; Path=/"));
            response.set_body(Stream::from(format!("visit number {visits} with the {theme} theme\n").into_bytes()));
        }
        Err(e) => {
            error!(cause = %e, "can't read request");
            response.set_status(400, "").expect("400 is a valid status");
        }
    }

    if let Err(e) = gateway.emit_response(&mut response, std::io::stdout().lock()) {
        error!(cause = %e, "can't send response");
    }
}
