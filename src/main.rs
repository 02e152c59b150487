// What you SEE now:
// • The text is drawn as thousands of small squares that rise from the bottom edge into the letters.
// • Move the mouse through the letters: squares scatter away and glide back home.
// • Type to change the text (it rebuilds on every key release except a bare Space).
// • Resize the window: the text re-centers and rebuilds once the size settles.
// • F2 pauses/resumes the animation. ESC quits.
//
// Usage: particle-text [settings.toml]   (RUST_LOG=debug for more detail)

use log::{debug, info};
use minifb::Key;
use particle_text::config::Settings;
use particle_text::draw::Drawer;
use particle_text::error::Error;
use particle_text::font;
use particle_text::input::{Keystroke, TextField};
use particle_text::particle::ParticleField;
use particle_text::pointer::SharedPointer;
use particle_text::raster::Rasterizer;
use particle_text::ticker::{Debounce, FpsMeter, FrameLoop};
use particle_text::types::FrameBuffer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Settings ---
       Visual: none; decides window size, font, particle feel. */
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref())?;
    let (w, h) = (settings.width, settings.height);
    info!(
        "{}x{} window, font {}px, gap {}, pointer radius {}",
        w, h, settings.font_size, settings.gap, settings.pointer_radius
    );

    /* --- Particle field ---
       Visual: the initial text is laid out; its particles start at the bottom edge. */
    let face = font::load_or_builtin(settings.font_path.as_deref());
    let rasterizer = Rasterizer::new(face, settings.text_style(), settings.gap);
    let pointer = SharedPointer::new(settings.pointer_radius);
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut field = ParticleField::new(
        rasterizer,
        pointer.clone(),
        settings.motion(),
        settings.max_text_width_ratio,
        w,
        h,
        rng,
    );
    field.rebuild(&settings.initial_text);

    /* --- Window + screen buffer ---
       Visual: a window opens; `screen` is the image you actually see each frame. */
    let mut drawer = Drawer::new("Particle Text", w, h, settings.target_fps)?;
    let mut screen = FrameBuffer::new(w, h);

    let mut text_field = TextField::default();
    let mut frame_loop = FrameLoop::new();
    let mut pending_size = Debounce::new(Duration::from_millis(settings.resize_debounce_ms));
    let mut fps = FpsMeter::new(Instant::now());

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !frame_loop.is_cancelled() {
        let now = Instant::now();

        /* 1) Loop control */
        if drawer.esc_pressed() {
            frame_loop.cancel();
            break;
        }
        if drawer.f2_pressed_once() {
            frame_loop.toggle_pause(); // visual: particles freeze / continue
        }

        /* 2) Pointer: only the latest position matters. */
        match drawer.mouse_pos() {
            Some((mx, my)) => {
                pointer.set(mx, my); // visual: squares near the cursor scatter
                pointer.set_active(true);
            }
            None => pointer.set_active(false),
        }

        /* 3) Text: edit on press, re-rasterize the whole value on release. */
        let shift = drawer.shift_down();
        for key in drawer.keys_pressed().into_iter().filter(|k| is_text_key(*k)) {
            text_field.press(Keystroke::from_key(key, shift));
        }
        let submitted = drawer
            .keys_released()
            .into_iter()
            .filter(|k| is_text_key(*k))
            .filter_map(|key| text_field.release(Keystroke::from_key(key, shift)))
            .last();
        if let Some(text) = submitted {
            debug!("Text changed: {text:?}");
            field.rebuild(&text); // visual: new letters rise from the bottom
        }

        /* 4) Resize: wait until the size stops changing, then rebuild once. */
        let (ww, wh) = drawer.size();
        let size = (ww.max(1), wh.max(1));
        if size != field.size() {
            pending_size.push(size, now);
        } else {
            pending_size.cancel(); // dragged back to where it started
        }
        if let Some((nw, nh)) = pending_size.poll(now) {
            debug!("Applying resize to {nw}x{nh}");
            screen.resize(nw, nh);
            field.resize(nw, nh);
            field.refresh(); // visual: text re-centered for the new window
        }

        /* 5) One animation frame (skipped while paused), then present. */
        frame_loop.step(&mut field, &mut screen);
        drawer.present(&screen)?;

        /* 6) FPS counter (logged once per second) */
        fps.frame(now);
    }

    info!("Stopped after {} frames", frame_loop.frames());
    Ok(())
}

/// Keys that belong to the text field rather than to loop control.
fn is_text_key(key: Key) -> bool {
    !matches!(key, Key::Escape | Key::F2)
}
