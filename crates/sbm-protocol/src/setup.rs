//! SDRAM controller bring-up.

/// `(address, width in bits, value)` writes replayed strictly in order to
/// initialize the i.MX21 SDRAM controller before a download. The run of
/// eight zero writes to `0xc000_0000` is the refresh training cycle the
/// controller requires while in precharge mode.
///
/// The monitor does not reliably ack every one of these, so the replay
/// treats missing or mismatched responses as success.
pub const SDRAM_SETUP: &[(u32, u32, u32)] = &[
    (0x1000_0000, 32, 0x0004_0304),
    (0x1002_0000, 32, 0x0000_0000),
    (0x1000_0004, 32, 0xfffb_fcfb),
    (0x1002_0004, 32, 0xffff_ffff),
    (0xdf00_1008, 32, 0x0000_2000),
    (0xdf00_100c, 32, 0x1111_8501),
    (0x1001_5520, 32, 0x0000_0000),
    (0x1001_5538, 32, 0x0000_0000),
    (0x1003_f300, 32, 0x0012_3456),
    (0xdf00_0000, 32, 0x9212_9399),
    (0xc020_0000, 32, 0x0000_0000),
    (0xdf00_0000, 32, 0xa212_0300),
    // refresh training, eight cycles
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xc000_0000, 32, 0x0000_0000),
    (0xdf00_0000, 32, 0xb212_0300),
    (0xc011_9800, 32, 0x0000_0000),
    (0xdf00_0000, 32, 0x8212_f339),
];
