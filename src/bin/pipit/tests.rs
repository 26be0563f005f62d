//! Tests for the pipit front end
//!
//! These never open a window, so they run headless.

use super::ui::*;
use super::*;
use minifb::Key;
use pipit::Screen;

mod ui_builder {
    use super::*;
    #[test]
    fn default() {
        let ui_builder = UIBuilder::default();
        assert_eq!((64, 32), (ui_builder.width, ui_builder.height));
        println!("{ui_builder:?}");
    }
    #[test]
    fn new() {
        let ui_builder = UIBuilder::new(32, 64, "dummy.ch8");
        assert_eq!(Some("dummy.ch8".into()), ui_builder.rom);
    }
}

mod frame_buffer {
    use super::*;
    #[test]
    fn update() {
        let mut screen = Screen::default();
        screen.toggle(2, 0);
        let mut fb = FrameBuffer::default();
        let format = FrameBufferFormat::default();
        let buffer = fb.update(&screen);
        assert_eq!(64 * 32, buffer.len());
        assert_eq!(format.fg, buffer[2]);
        assert_eq!(format.bg, buffer[3]);
    }
}

#[test]
fn identify_key() {
    let layout = [
        Key::X, Key::Key1, Key::Key2, Key::Key3, //
        Key::Q, Key::W, Key::E, Key::A, //
        Key::S, Key::D, Key::Z, Key::C, //
        Key::Key4, Key::R, Key::F, Key::V, //
    ];
    for (expected, key) in layout.into_iter().enumerate() {
        assert_eq!(Some(expected), ui::identify_key(key));
    }
    assert_eq!(None, ui::identify_key(Key::Space));
}

mod arguments {
    use super::*;
    fn parse(args: &[&str]) -> Arguments {
        Arguments::parse_args_default(args).expect("arguments should parse")
    }
    #[test]
    fn defaults() {
        let options = parse(&["rom.ch8"]);
        assert_eq!(10, options.speed);
        assert_eq!(60, options.frame_rate);
        assert_eq!(None, options.timer);
        assert_eq!(Quirks::default(), options.quirks());
    }
    #[test]
    fn quirks() {
        let options = parse(&["--vip", "-w", "rom.ch8"]);
        let quirks = options.quirks();
        assert!(quirks.vf_reset && quirks.shift_vy && quirks.dma_inc && quirks.screen_wrap);
        let options = parse(&["-z", "rom.ch8"]);
        assert_eq!(
            Quirks {
                vf_reset: true,
                ..Default::default()
            },
            options.quirks()
        );
    }
    #[test]
    fn breakpoints() {
        let options = parse(&["--break", "2a0", "--break", "300", "rom.ch8"]);
        assert_eq!(vec![0x2a0, 0x300], options.breakpoints);
    }
}
