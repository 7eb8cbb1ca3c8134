mod color;
mod compositor;
mod headless;
mod pixel_buffer;

pub use color::{Color, PackedColor};
pub use compositor::draw_sprite;
pub use headless::HeadlessPresenter;
pub use pixel_buffer::PixelBuffer;

use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::control::{Command, InputSource};
use crate::error::{Error, Result};
use crate::game::ControlState;

/// Anything that can show a finished frame
pub trait Presenter {
    /// Display the buffer. Called once per tick, may block for vsync.
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()>;
}

/// SDL window and accelerated canvas
pub struct Display {
    canvas: Canvas<Window>,
    width: u32,
    height: u32,
}

/// Streaming texture the buffer is uploaded into every frame
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

/// Keyboard and window events from SDL
pub struct SdlInput {
    event_pump: EventPump,
}

/// A display paired with its render target, presenting through SDL
pub struct Screen<'a> {
    display: Display,
    target: RenderTarget<'a>,
}

impl Display {
    /// Open a `width` x `height` window.
    /// vsync=true: presentation is locked to monitor refresh
    /// vsync=false: uncapped framerate
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>, SdlInput)> {
        let sdl_context = sdl2::init().map_err(Error::Display)?;
        let video_subsystem = sdl_context.video().map_err(Error::Display)?;

        // Nearest-neighbour scaling keeps the pixel art sharp
        sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0");

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| Error::Display(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::Display(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(Error::Display)?;

        info!("display: {}x{} window, vsync {}", width, height, vsync);

        Ok((
            Self {
                canvas,
                width,
                height,
            },
            texture_creator,
            SdlInput { event_pump },
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Upload the buffer and stretch it over the window.
    /// Buffer row 0 is the bottom of the screen, so the copy flips vertically.
    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
        if (buffer.width(), buffer.height()) != (target.width, target.height) {
            return Err(Error::Display(format!(
                "buffer is {}x{} but the render target is {}x{}",
                buffer.width(),
                buffer.height(),
                target.width,
                target.height
            )));
        }

        target
            .texture
            .update(None, buffer.as_bytes(), buffer.pitch())
            .map_err(|e| Error::Display(e.to_string()))?;

        self.canvas
            .copy_ex(&target.texture, None, None, 0.0, None, false, true)
            .map_err(Error::Display)?;
        self.canvas.present();
        Ok(())
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a render target matching the pixel buffer size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        // RGBA8888 is a native-endian 0xRRGGBBAA word, the buffer's own layout
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| Error::Display(e.to_string()))?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}

impl<'a> Screen<'a> {
    pub fn new(display: Display, target: RenderTarget<'a>) -> Self {
        Self { display, target }
    }
}

impl Presenter for Screen<'_> {
    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.display.present(&mut self.target, buffer)
    }
}

impl SdlInput {
    /// Map an SDL event to a frame loop command
    fn map_event(event: &Event) -> Option<Command> {
        match event {
            Event::Quit { .. } => Some(Command::Quit),
            Event::KeyDown {
                keycode: Some(k),
                repeat: false,
                ..
            } => map_key(*k),
            _ => None,
        }
    }
}

impl InputSource for SdlInput {
    fn poll(&mut self, control: &mut ControlState) {
        for event in self.event_pump.poll_iter() {
            if let Some(cmd) = Self::map_event(&event) {
                control.apply(cmd);
            }
        }
    }
}

fn map_key(key: Keycode) -> Option<Command> {
    match key {
        Keycode::Escape | Keycode::Q => Some(Command::Quit),
        Keycode::P => Some(Command::TogglePause),
        Keycode::Period => Some(Command::Step),
        _ => None,
    }
}
