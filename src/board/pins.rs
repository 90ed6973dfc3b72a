//! GPIO |     Function    |      Notes
//! -----+-----------------+----------------------------------
//!  4   | EPD RST         | Reset (active low)
//!  5   | EPD DC          | Data/Command select
//!  6   | SPI2 SCK        | Shared SPI clock
//!  7   | SPI2 MOSI       | Shared SPI data out
//!  8   | EPD BUSY        | Busy signal from display (active high)
//! 10   | EPD CS          | Display chip select
//! 18   | EPD PWR         | Panel supply enable (optional, active high)

// ----- E-Paper Display -----
pub const EPD_CS: u8 = 10;
pub const EPD_DC: u8 = 5;
pub const EPD_RST: u8 = 4;
pub const EPD_BUSY: u8 = 8;
pub const EPD_PWR: u8 = 18;

// ----- SPI Bus -----
pub const EPD_SPI_HOST: u8 = 2;
pub const SPI_SCK: u8 = 6;
pub const SPI_MOSI: u8 = 7;
pub const SPI_FREQ_MHZ: u32 = 20;
