use std::fmt::Write;
use std::path::Path;

use micro_cgi_gateway::{Gateway, environment};
use micro_cgi_message::protocol::{Response, Stream};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

// printf -- '--XyZ\r\nContent-Disposition: form-data; name="doc"; filename="a.txt"\r\n\r\nhello\r\n--XyZ--\r\n' | \
//     CONTENT_TYPE='multipart/form-data; boundary=XyZ' REQUEST_METHOD=POST REQUEST_URI=/upload \
//     cargo run --example upload
fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut gateway = Gateway::default();
    let mut response = Response::default();
    response.set_header("Content-Type", "text/plain; charset=utf-8");

    let mut report = String::new();
    match gateway.server_request(environment(), std::io::stdin().lock()) {
        Ok(request) => {
            let names: Vec<String> = request.uploaded_files().iter().map(|(name, _)| name.to_owned()).collect();
            for name in names {
                let Some(mut file) = request.take_uploaded_file(&name) else {
                    continue;
                };
                if !file.error().is_ok() {
                    warn!(field = %name, error = ?file.error(), "upload failed");
                    let _ = writeln!(report, "{name}: upload failed ({:?})", file.error());
                    continue;
                }

                let client_name = Path::new(file.client_filename()).file_name().unwrap_or_default().to_string_lossy();
                let target = std::env::temp_dir().join(format!("micro-cgi-{client_name}"));
                match file.move_to(&target) {
                    Ok(()) => {
                        info!(field = %name, target = %target.display(), "stored upload");
                        let _ = writeln!(report, "{name}: {} bytes stored at {}", file.size(), target.display());
                    }
                    Err(e) => {
                        error!(field = %name, cause = %e, "can't store upload");
                        let _ = writeln!(report, "{name}: can't store upload");
                    }
                }
            }
        }
        Err(e) => {
            error!(cause = %e, "can't read request");
            response.set_status(400, "").expect("400 is a valid status");
            report.push_str("bad request\n");
        }
    }
    response.set_body(Stream::from(report.into_bytes()));

    if let Err(e) = gateway.emit_response(&mut response, std::io::stdout().lock()) {
        error!(cause = %e, "can't send response");
    }
}
