use micro_cgi_gateway::{Gateway, environment};
use micro_cgi_message::protocol::{Response, Stream};
use serde::Deserialize;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Debug)]
struct Search {
    q: String,
    #[serde(default)]
    page: u32,
}

// QUERY_STRING='q=rust+cgi&page=2' REQUEST_METHOD=GET REQUEST_URI='/search?q=rust+cgi&page=2' cargo run --example query
fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut gateway = Gateway::default();
    let mut response = Response::default();
    response.set_header("Content-Type", "text/plain; charset=utf-8");

    let body = match gateway.server_request(environment(), std::io::stdin().lock()) {
        Ok(request) => match request.query_as::<Search>() {
            Ok(search) => {
                info!(?search, "searching");
                format!("searching {:?}, page {}\n", search.q, search.page)
            }
            Err(e) => {
                response.set_status(400, "").expect("400 is a valid status");
                format!("invalid query: {e}\n")
            }
        },
        Err(e) => {
            response.set_status(400, "").expect("400 is a valid status");
            format!("bad request: {e}\n")
        }
    };
    response.set_body(Stream::from(body.into_bytes()));

    if let Err(e) = gateway.emit_response(&mut response, std::io::stdout().lock()) {
        error!(cause = %e, "can't send response");
    }
}
