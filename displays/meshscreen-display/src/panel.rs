//! I2C monochrome panel driver
//!
//! Drives 128x64 SSD1306 and SH1106 OLEDs and ST7567 LCDs. The controller
//! model is chosen at runtime from [`DisplayConfig`]; the three share the
//! page layout of [`PageBuffer`] and differ in their init sequence, column
//! offset and contrast range.

use embedded_hal::i2c::I2c;

use meshscreen_core::config::{DisplayConfig, PanelModel};
use meshscreen_core::traits::{DisplayError, DisplaySurface};

use crate::framebuffer::{PageBuffer, GLYPH_SIZE, HEIGHT, PAGES, WIDTH};

/// Control byte: command stream follows
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte: display data follows
const CONTROL_DATA: u8 = 0x40;

/// Controller commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const RESUME_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SEG_NORMAL: u8 = 0xA0;
    pub const SEG_REMAP: u8 = 0xA1;
    pub const COM_SCAN_INC: u8 = 0xC0;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    /// SSD1306 charge pump
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    /// SH1106 DC-DC converter
    pub const SET_DC_DC: u8 = 0xAD;
    /// ST7567 software reset
    pub const LCD_RESET: u8 = 0xE2;
    /// ST7567 1/9 bias
    pub const LCD_BIAS_9: u8 = 0xA2;
    /// ST7567 booster, regulator and follower on
    pub const LCD_POWER_ALL: u8 = 0x2F;
    /// ST7567 regulation ratio 5.0
    pub const LCD_REGULATION: u8 = 0x24;
}

/// Panel on an I2C bus
pub struct I2cPanel<I2C> {
    i2c: I2C,
    address: u8,
    model: PanelModel,
    flip: bool,
    buffer: PageBuffer,
    initialized: bool,
}

impl<I2C: I2c> I2cPanel<I2C> {
    /// Create a driver for the panel described by `config`
    pub fn new(i2c: I2C, config: &DisplayConfig) -> Self {
        Self {
            i2c,
            address: config.i2c_address,
            model: config.panel,
            flip: config.flip_vertically,
            buffer: PageBuffer::new(),
            initialized: false,
        }
    }

    pub fn model(&self) -> PanelModel {
        self.model
    }

    /// The frame buffer as last drawn
    pub fn buffer(&self) -> &PageBuffer {
        &self.buffer
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// First controller column wired to the glass
    fn column_offset(&self) -> u8 {
        match self.model {
            PanelModel::Sh1106 => 2,
            _ => 0,
        }
    }

    fn orientation(&self) -> [u8; 2] {
        if self.flip {
            [cmd::SEG_NORMAL, cmd::COM_SCAN_INC]
        } else {
            [cmd::SEG_REMAP, cmd::COM_SCAN_DEC]
        }
    }

    fn commands(&mut self, cmds: &[u8]) -> Result<(), DisplayError> {
        for &c in cmds {
            self.i2c
                .write(self.address, &[CONTROL_COMMAND, c])
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    fn init_sequence(&mut self) -> Result<(), DisplayError> {
        let [seg, com] = self.orientation();
        match self.model {
            PanelModel::Ssd1306 => self.commands(&[
                cmd::DISPLAY_OFF,
                cmd::SET_CLOCK_DIV,
                0x80,
                cmd::SET_MUX_RATIO,
                (HEIGHT - 1) as u8,
                cmd::SET_DISPLAY_OFFSET,
                0x00,
                cmd::SET_START_LINE,
                cmd::SET_CHARGE_PUMP,
                0x14,
                cmd::SET_MEMORY_MODE,
                0x02, // Page addressing
                seg,
                com,
                cmd::SET_COM_PINS,
                0x12,
                cmd::SET_PRECHARGE,
                0xF1,
                cmd::SET_VCOM_DETECT,
                0x40,
                cmd::RESUME_RAM,
                cmd::SET_NORMAL,
            ]),
            PanelModel::Sh1106 => self.commands(&[
                cmd::DISPLAY_OFF,
                cmd::SET_CLOCK_DIV,
                0x80,
                cmd::SET_MUX_RATIO,
                (HEIGHT - 1) as u8,
                cmd::SET_DISPLAY_OFFSET,
                0x00,
                cmd::SET_START_LINE,
                cmd::SET_DC_DC,
                0x8B,
                seg,
                com,
                cmd::SET_COM_PINS,
                0x12,
                cmd::SET_PRECHARGE,
                0xF1,
                cmd::SET_VCOM_DETECT,
                0x40,
                cmd::SET_NORMAL,
            ]),
            PanelModel::St7567 => self.commands(&[
                cmd::LCD_RESET,
                cmd::LCD_BIAS_9,
                seg,
                com,
                cmd::LCD_POWER_ALL,
                cmd::LCD_REGULATION,
                cmd::SET_START_LINE,
                cmd::SET_NORMAL,
            ]),
            PanelModel::None => Err(DisplayError::NotInitialized),
        }
    }

    fn check_ready(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<I2C: I2c> DisplaySurface for I2cPanel<I2C> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.init_sequence().inspect_err(|_| {
            warn!("Panel init failed");
        })?;
        self.buffer.clear();
        self.initialized = true;
        debug!("Panel initialized at {:x}", self.address);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.clear();
        Ok(())
    }

    fn fill(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill();
        Ok(())
    }

    fn draw_text(&mut self, x: i16, y: i16, glyphs: &[u8]) -> Result<(), DisplayError> {
        if x >= WIDTH as i16 || y >= HEIGHT as i16 {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.buffer.draw_glyphs(x, y, glyphs);
        Ok(())
    }

    fn display(&mut self) -> Result<(), DisplayError> {
        self.check_ready()?;
        let offset = self.column_offset();
        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;

        for page in 0..PAGES {
            self.commands(&[
                cmd::SET_PAGE_ADDR | page as u8,
                cmd::SET_LOW_COLUMN | (offset & 0x0F),
                cmd::SET_HIGH_COLUMN | (offset >> 4),
            ])?;
            data[1..].copy_from_slice(self.buffer.page(page));
            self.i2c
                .write(self.address, &data)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    fn set_power(&mut self, on: bool) -> Result<(), DisplayError> {
        self.check_ready()?;
        self.commands(&[if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }])
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.check_ready()?;
        let contrast = match self.model {
            // Electronic volume is 6 bits
            PanelModel::St7567 => level >> 2,
            _ => level,
        };
        self.commands(&[cmd::SET_CONTRAST, contrast])
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH as u16, HEIGHT as u16)
    }

    fn glyph_size(&self) -> (u8, u8) {
        GLYPH_SIZE
    }
}
