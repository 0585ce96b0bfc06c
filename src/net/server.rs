//! Core HTTP server implementation.
//!
//! This module implements the low-level HTTP server runtime.
//! It is responsible only for networking concerns such as:
//! - accepting TCP connections,
//! - reading raw bytes from the network,
//! - writing raw bytes back to the client.
//!
//! Higher-level HTTP semantics, such as request parsing, validation,
//! and response generation, are delegated to other modules
//! in the `http` and `handler` namespaces.
//!
//! The server is fully asynchronous and leverages the `async-std` crate
//! to provide non-blocking I/O and concurrent client handling.
//!
//! ## Request handling flow
//!
//! The typical lifecycle of a client connection is as follows:
//!
//! 1. Accept a TCP connection
//! 2. Read raw data from the stream
//! 3. Incrementally parse the data into an [`HttpRequest`]
//!    (delegated to [`http::parser::Parser`](crate::http::parser::Parser))
//! 4. Validate the request
//!    (delegated to [`http::validator::Validator`](crate::http::validator::Validator))
//! 5. Generate an [`HttpResponse`] and finalize its cookies
//!    (delegated to [`handler::handle_request`](crate::handler::handle_request))
//! 6. Serialize and write the response back to the client
//!
//! Finalization happens before a single header byte is written. If it fails
//! the response is dropped and a 500 is sent in its place. Errors at any
//! other stage result in appropriate HTTP error responses.

use std::net::SocketAddr;
use std::time::SystemTime;

use async_std::io;
use async_std::net::{TcpListener, TcpStream};
use async_std::prelude::*;
use async_std::task;
use thiserror::Error;

use crate::config::{ServerConfig, config};
use crate::handler;
use crate::http::parser::*;
use crate::http::request::HttpRequest;
use crate::http::response::{HttpResponse, ResponseHeader};
use crate::http::validator::{Validator, ValidatorError};

pub struct Server {
    listener: TcpListener,
}

/// Errors that can occur while reading and parsing an HTTP request from the stream
/// used to interrupt the flow and return appropriate responses.
#[derive(Debug, Error)]
enum ReadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed")]
    ConnectionClosed,
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

impl Server {
    /// Binds to the configured address and port.
    pub async fn bind(cfg: &ServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind((cfg.address, cfg.port)).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the listener fails, spawning a new
    /// asynchronous task for each client.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            task::spawn(async move {
                if let Err(err) = Self::handle_client(stream).await {
                    tracing::warn!(%peer, %err, "failed to write response");
                }
            });
        }
    }

    /// Reads and incrementally parses an HTTP request from the TCP stream.
    ///
    /// The request is parsed as data becomes available. Once all headers are read,
    /// the request is validated. If a body is expected, it is read until completion.
    ///
    /// Returns a fully constructed [`HttpRequest`] or a [`ReadError`] in case of
    /// I/O, parsing, or validation failure.
    async fn read_request(stream: &mut TcpStream) -> Result<HttpRequest, ReadError> {
        let mut parser = Parser::new();
        let mut req = HttpRequest::new();
        let mut buffer = vec![0; config().buffer_size];
        let mut outcome = ParserOk::Incomplete;

        loop {
            match outcome {
                ParserOk::Incomplete => {
                    // The parser needs more data to make progress.
                    let n = match io::timeout(config().read_timeout, stream.read(&mut buffer)).await {
                        Ok(0) => return Err(ReadError::ConnectionClosed),
                        Ok(n) => n,
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e.into()),
                    };
                    outcome = parser.feed(&buffer[..n], &mut req)?;
                }
                ParserOk::HeadersDone => {
                    // Validate the request early, before reading the body.
                    Validator::validate_request(&req)?;

                    // Feeding an empty slice lets the parser continue on
                    // buffered body bytes without a new network read.
                    outcome = parser.feed(&[], &mut req)?;
                }
                ParserOk::Done => break, // request is fully parsed
            }
        }

        Ok(req)
    }

    /// Writes the given `HttpResponse` back to the TCP stream.
    /// Serializes the response headers and body appropriately.
    async fn write_response(
        stream: &mut TcpStream,
        mut response: HttpResponse,
    ) -> std::io::Result<()> {
        response.set_header(ResponseHeader::Date, &httpdate::fmt_http_date(SystemTime::now()));
        response.set_header(ResponseHeader::Server, &config().server_name);
        response.set_header(ResponseHeader::Connection, "close");

        let headers = response.build_headers();
        io::timeout(config().write_timeout, async {
            stream.write_all(headers.as_bytes()).await?;
            stream.write_all(&response.body).await?;
            stream.flush().await
        })
        .await
    }

    /// Handles a single client connection.
    /// Reads the HTTP request, processes it via the handler, and writes back the response.
    async fn handle_client(mut stream: TcpStream) -> std::io::Result<()> {
        let response = match Self::read_request(&mut stream).await {
            Ok(req) => {
                tracing::debug!(method = ?req.method, uri = %req.uri, "handling request");
                match handler::handle_request(&req) {
                    Ok(res) => res,
                    Err(err) => {
                        tracing::error!(uri = %req.uri, %err, "response aborted before headers were sent");
                        handler::aborted()
                    }
                }
            }
            Err(ReadError::Io(err)) => {
                tracing::warn!(%err, "i/o error while reading request");
                return Ok(());
            }
            Err(ReadError::ConnectionClosed) => return Ok(()),
            Err(ReadError::Parser(err)) => {
                tracing::debug!(%err, "rejecting unparsable request");
                handler::handle_error(err.into_http_status())
            }
            Err(ReadError::Validator(err)) => {
                tracing::debug!(%err, "rejecting invalid request");
                handler::handle_error(err.into_http_status())
            }
        };

        Self::write_response(&mut stream, response).await
    }
}
