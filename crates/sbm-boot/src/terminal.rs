//! Raw pass-through terminal.

use std::{
    io::{self, Read, Write},
    thread,
};

use sbm_port::Port;

use crate::Result;

/// Relay the local console and the serial line byte-for-byte in both
/// directions until the process is killed. There is no exit key: ^C and
/// every other control byte is forwarded to the device, so ending the
/// session takes an external kill. Putting the local console into
/// raw/no-echo mode is left to the invoking environment.
pub fn run(port: &mut Port) -> Result<()> {
    println!("Interactive terminal:\n");

    // Inbound path: a dedicated thread owns its own handle on the line and
    // drains whatever is available. A read error ends this path only; the
    // keyboard path keeps transmitting.
    let mut rx = port.try_clone()?;
    thread::spawn(move || {
        let mut out = io::stdout();
        let mut buf = [0u8; 512];
        loop {
            match rx.read(&mut buf) {
                Ok(0) => (),
                Ok(n) => {
                    let _ = out.write_all(&buf[..n]);
                    let _ = out.flush();
                }
                // nothing within the port timeout, keep listening
                Err(e) if e.kind() == io::ErrorKind::TimedOut => (),
                Err(e) => {
                    eprintln!("read error: {e}");
                    return;
                }
            }
        }
    });

    let mut stdin = io::stdin();
    let mut byte = [0u8; 1];
    loop {
        if stdin.read(&mut byte)? < 1 {
            continue;
        }
        port.write_all(&byte)?;
    }
}
