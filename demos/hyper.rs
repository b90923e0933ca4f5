use nuclear_dispatch::hyper_service::RouterService;
use nuclear_dispatch::{chain, App, MountTarget, Router};

use std::convert::Infallible as Never;
use std::net::SocketAddr;

use hyper::service::make_service_fn;

fn app() -> App {
    let mut api = Router::new();
    api.get(
        "/file/:filepath+",
        chain![|req, res, _| {
            let path = req.params().get("filepath").unwrap_or("");
            res.end(format!("access file: {}", path))
        }],
    );

    let mut app = App::new();
    app.mount(
        "/",
        Some(MountTarget::callback(|req, res, next| {
            println!("{} {}", req.method(), req.path());
            next.call(req, res)
        })),
    )
    .mount_router("/api/v1", api)
    .get(
        "/hello/:name",
        chain![|req, res, _| {
            let name = req.params().get("name").unwrap_or("");
            res.end(format!("hello, {}!", name))
        }],
    );
    app
}

#[tokio::main]
async fn main() {
    let service = RouterService::new(app());

    let make = make_service_fn(move |_| {
        let service = service.clone();
        async move { Ok::<_, Never>(service) }
    });

    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();

    let server = hyper::Server::bind(&addr).serve(make);

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!("api: http://{}/api/v1/file/path/to/public/file", addr);
    println!("404: http://{}/other/path", addr);
    println!();

    if let Err(e) = server.await {
        eprintln!("server error: {}", e);
    }
}
