use async_io::Async;
use echo_ws::connection::WsConnection;
use echo_ws::handshake::is_upgrade_request;
use futures::executor::block_on;
use futures::prelude::*;
use http::Request;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::thread;

const MAX_REQUEST_HEAD: usize = 8192;

fn parse_request(buffer: &[u8]) -> anyhow::Result<Option<Request<()>>> {
    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut parsed = httparse::Request::new(&mut headers);
    if parsed.parse(buffer)?.is_partial() {
        return Ok(None);
    }
    let mut builder = Request::builder()
        .method(parsed.method.unwrap_or("GET"))
        .uri(parsed.path.unwrap_or("/"));
    for header in parsed.headers.iter() {
        builder = builder.header(header.name, header.value);
    }
    Ok(Some(builder.body(())?))
}

async fn read_request(transport: &mut Async<TcpStream>) -> anyhow::Result<Request<()>> {
    let mut buffer = Vec::new();
    let mut byte = [0u8; 1];
    // Byte by byte, so nothing after the request head is consumed.
    loop {
        transport.read_exact(&mut byte).await?;
        buffer.push(byte[0]);
        if buffer.ends_with(b"\r\n\r\n") {
            if let Some(request) = parse_request(&buffer)? {
                return Ok(request);
            }
        }
        anyhow::ensure!(buffer.len() < MAX_REQUEST_HEAD, "request head too large");
    }
}

async fn serve(mut transport: Async<TcpStream>) -> anyhow::Result<()> {
    let request = read_request(&mut transport).await?;
    if !is_upgrade_request(&request) {
        log::info!("not an upgrade request: {} {}", request.method(), request.uri());
        transport
            .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await?;
        return Ok(());
    }
    log::info!("upgrade request received");
    let mut connection = WsConnection::from_request(transport, &request)?;
    let status = connection.run().await?;
    log::info!("session ended, sent status {:?}", status);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let listener = Async::<TcpListener>::bind((Ipv4Addr::UNSPECIFIED, 8080))?;
    log::info!("listening on {}", listener.get_ref().local_addr()?);
    block_on(async {
        loop {
            let (transport, peer) = listener.accept().await?;
            log::info!("accepted {}", peer);
            thread::spawn(move || {
                if let Err(err) = block_on(serve(transport)) {
                    log::warn!("{}: {}", peer, err);
                }
            });
        }
    })
}
