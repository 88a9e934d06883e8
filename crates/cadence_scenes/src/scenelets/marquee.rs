use std::cell::RefCell;
use std::rc::Rc;

use cadence_animation::{Color, Easing, FieldMap, TweenTarget, Tweenable};

use crate::args::Args;
use crate::error::Result;
use crate::instruction::SceneletDef;
use crate::scene::Scene;

pub(super) const NAME: &str = "marquee";

const PADDING: f32 = 10.0;

/// Animated state of a marquee banner
///
/// `fadeness` scales the band height (0 hidden, 1 full), `scroll` moves the
/// text across the window from the right edge (0) to fully off the left (1).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Banner {
    pub fadeness: f64,
    pub scroll: f64,
}

impl Tweenable for Banner {
    fn get(&self, field: &str) -> Option<f64> {
        match field {
            "fadeness" => Some(self.fadeness),
            "scroll" => Some(self.scroll),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: f64) {
        match field {
            "fadeness" => self.fadeness = value,
            "scroll" => self.scroll = value,
            _ => {}
        }
    }
}

struct Marquee {
    text: String,
    background: Color,
    color: Color,
    /// Distance the text travels: screen width plus text width
    window: f32,
    height: f32,
    text_height: f32,
    banner: Rc<RefCell<Banner>>,
    animation: Scene,
}

fn animate(scene: &Scene, banner: &Rc<RefCell<Banner>>) -> Result<()> {
    let target = || -> TweenTarget { Rc::clone(banner) as TweenTarget };
    scene
        .tween(target(), 0.25, Easing::Linear, FieldMap::new().with("fadeness", 1.0))?
        .tween(target(), 1.0, Easing::OutExpo, FieldMap::new().with("scroll", 0.5))?
        .tween(target(), 1.0, Easing::InExpo, FieldMap::new().with("scroll", 1.0))?
        .tween(target(), 0.25, Easing::Linear, FieldMap::new().with("fadeness", 0.0))?
        .run(false)?;
    Ok(())
}

pub(super) fn def() -> SceneletDef {
    SceneletDef::new(|state, activation, args| {
        let text = args.text(0).unwrap_or_default().to_owned();
        let background = args.color(1).unwrap_or(Color::BLACK);
        let color = args.color(2).unwrap_or(Color::WHITE);

        let engine = activation.engine();
        let (window, text_height) = {
            let canvas = engine.services().canvas.borrow();
            let (width, _) = canvas.size();
            (width + canvas.text_width(&text), canvas.line_height())
        };

        let banner = Rc::new(RefCell::new(Banner::default()));
        let animation = engine.scene();
        if let Err(err) = animate(&animation, &banner) {
            tracing::error!(%err, "marquee: failed to start animation");
            return;
        }

        state.insert(Marquee {
            text,
            background,
            color,
            window,
            height: text_height + PADDING,
            text_height,
            banner,
            animation,
        });
    })
    .update(|state, _| {
        state
            .get::<Marquee>()
            .is_some_and(|marquee| marquee.animation.is_running())
    })
    .render(|state, scene| {
        let Some(marquee) = state.get::<Marquee>() else {
            return;
        };
        let banner = *marquee.banner.borrow();
        let mut canvas = scene.engine().services().canvas.borrow_mut();
        let (width, height) = canvas.size();

        let box_height = marquee.height * banner.fadeness as f32;
        let box_y = height / 2.0 - box_height / 2.0;
        let text_x = width - banner.scroll as f32 * marquee.window;
        let text_y = box_y + box_height / 2.0 - marquee.text_height / 2.0;

        canvas.fill_rect(0.0, box_y, width, box_height, marquee.background);
        canvas.draw_text(
            text_x + 1.0,
            text_y + 1.0,
            &marquee.text,
            Color::BLACK.with_alpha(marquee.color.a),
        );
        canvas.draw_text(text_x, text_y, &marquee.text, marquee.color);
    })
}

impl Scene {
    /// Scroll `text` across a band in the middle of the screen
    pub fn marquee(&self, text: &str, background: Color, color: Color) -> Result<&Self> {
        self.op(
            NAME,
            Args::new().with(text).with(background).with(color),
        )
    }
}
