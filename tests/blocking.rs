//! Tests for the blocking facade, driven from plain synchronous tests

use std::io::Write;
use std::net::TcpStream;
use std::thread;
use std::time::Duration;
use tcpfixture::{BlockingServer, ServerError};

#[test]
fn test_server() -> anyhow::Result<()> {
    let server = BlockingServer::bind()?;

    let mut conn = TcpStream::connect(server.address())?;

    assert!(!server.received("foo"), "haven't sent anything yet");

    write!(conn, "cool\nneat\nincomplete")?;

    server.wait_for_lines(2, Duration::from_secs(1))?;

    assert!(server.received("oo"));
    assert!(server.received_line("cool"));

    let err = server
        .wait_for_lines(3, Duration::from_millis(1))
        .unwrap_err();
    assert!(matches!(err, ServerError::Timeout { requested: 3, actual: 2 }));

    assert!(!server.received("incomplete"));
    assert!(!server.received_line("incomplete"));
    assert_eq!(server.lines(), vec!["cool", "neat"]);

    drop(conn);
    server.close();
    Ok(())
}

#[test]
fn test_client_on_another_thread() -> anyhow::Result<()> {
    let server = BlockingServer::bind()?;
    let address = server.address();

    let client = thread::spawn(move || -> std::io::Result<()> {
        let mut conn = TcpStream::connect(address)?;
        write!(conn, "hello\nworld!\n")?;
        Ok(())
    });

    server.wait_for_lines(2, Duration::from_secs(1))?;
    assert!(server.received_line("hello") && server.received("world"));

    client.join().expect("client thread panicked")?;
    server.close();
    Ok(())
}

#[test]
fn test_close_blocks_until_client_disconnects() -> anyhow::Result<()> {
    let server = BlockingServer::bind()?;
    let conn = TcpStream::connect(server.address())?;

    // Make sure the connection is accepted before closing
    while server.stats().connections_accepted == 0 {
        thread::sleep(Duration::from_millis(1));
    }

    let started = std::time::Instant::now();
    let disconnect = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        drop(conn);
    });

    server.close();
    assert!(started.elapsed() >= Duration::from_millis(100));

    disconnect.join().expect("disconnect thread panicked");
    Ok(())
}
