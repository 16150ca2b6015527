use micro_cgi_gateway::{Gateway, environment};
use micro_cgi_message::protocol::{Response, Stream};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

// QUERY_STRING='name=cgi' REQUEST_METHOD=GET REQUEST_URI='/hello?name=cgi' cargo run --example hello_world
fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut gateway = Gateway::default();
    let mut response = Response::default();
    response.set_header("Content-Type", "text/plain; charset=utf-8");

    match gateway.server_request(environment(), std::io::stdin().lock()) {
        Ok(request) => {
            let name = request.query_param("name").unwrap_or("world");
            response.set_body(Stream::from(format!("hello {name}\n").into_bytes()));
        }
        Err(e) => {
            error!(cause = %e, "can't read request");
            response.set_status(400, "").expect("400 is a valid status");
            response.set_body(Stream::from("bad request\n"));
        }
    }

    if let Err(e) = gateway.emit_response(&mut response, std::io::stdout().lock()) {
        error!(cause = %e, "can't send response");
    }
}
