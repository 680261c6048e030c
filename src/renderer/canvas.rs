//! Canvas 2D backend

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::snapshot::RenderSnapshot;
use super::sprites::SpriteSet;
use crate::sim::{Facing, LevelPhase, Rect};

const SKY: &str = "#87ceeb";
const PLATFORM: &str = "#8b5a2b";
const PLATFORM_TOP: &str = "#4caf50";
const APPLE: &str = "#e53935";
const HAZARD: &str = "#6a1b9a";
const PLAYER: &str = "#1e88e5";
const OWL: &str = "#a1887f";
const TEXT: &str = "#ffffff";

const MINIMAP_WIDTH: f32 = 200.0;
const MINIMAP_HEIGHT: f32 = 40.0;
const MINIMAP_MARGIN: f32 = 10.0;

/// Static sprites requested once at startup
const SPRITES: [(&str, &str); 4] = [
    ("player", "image/knight/idle.png"),
    ("hazard", "image/enemy/walk.png"),
    ("apple", "image/apple.png"),
    ("owl", "image/owl/owl.png"),
];

type Sprites = Rc<RefCell<SpriteSet<HtmlImageElement>>>;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    sprites: Sprites,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let renderer = Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            sprites: Rc::new(RefCell::new(SpriteSet::new())),
        };
        for (name, src) in SPRITES {
            renderer.load_sprite(name, src, 0);
        }
        Ok(renderer)
    }

    /// Request the level background for level generation `generation`
    pub fn load_background(&self, src: Option<&str>, generation: u64) {
        match src {
            Some(src) => self.load_sprite("background", src, generation),
            None => self.sprites.borrow_mut().request("background", "", generation),
        }
    }

    fn load_sprite(&self, name: &'static str, src: &str, generation: u64) {
        self.sprites.borrow_mut().request(name, src, generation);
        if src.is_empty() {
            return;
        }
        let Ok(image) = HtmlImageElement::new() else {
            self.sprites.borrow_mut().fail(name, generation);
            return;
        };

        let onload = {
            let sprites = self.sprites.clone();
            let image = image.clone();
            Closure::<dyn FnMut()>::new(move || {
                sprites.borrow_mut().complete(name, generation, image.clone());
            })
        };
        let onerror = {
            let sprites = self.sprites.clone();
            Closure::<dyn FnMut()>::new(move || {
                sprites.borrow_mut().fail(name, generation);
            })
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        image.set_src(src);
    }

    pub fn render(&self, snapshot: &RenderSnapshot, show_minimap: bool) {
        let ctx = &self.ctx;
        let camera = snapshot.camera_x;

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(SKY);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        {
            let (w, h) = (self.width, self.height);
            self.sprites.borrow_mut().draw_with("background", |img| {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h);
            });
        }

        for platform in &snapshot.platforms {
            self.fill(platform, camera, PLATFORM);
            let top = Rect {
                size: glam::Vec2::new(platform.size.x, platform.size.y.min(6.0)),
                ..*platform
            };
            self.fill(&top, camera, PLATFORM_TOP);
        }

        for item in snapshot.visible_collectibles() {
            ctx.set_global_alpha(item.alpha as f64);
            self.sprite_or_rect("apple", &item.rect, camera, APPLE, Facing::Right);
        }
        ctx.set_global_alpha(1.0);

        for hazard in &snapshot.hazards {
            self.sprite_or_rect("hazard", &hazard.rect, camera, HAZARD, hazard.facing);
        }

        if let Some(guide) = &snapshot.guide {
            self.sprite_or_rect("owl", &guide.rect, camera, OWL, Facing::Right);
            let x = (guide.rect.pos.x - camera) as f64;
            let y = guide.rect.pos.y as f64;
            ctx.set_fill_style_str(TEXT);
            ctx.set_font("16px sans-serif");
            if guide.hint_visible {
                let _ = ctx.fill_text("Press F", x, y - 10.0);
            }
            if guide.bubble_visible {
                let _ = ctx.fill_text("Hoo! Gather the apples!", x, y - 30.0);
            }
            if let Some(line) = &guide.dialogue {
                self.dialogue_box(line);
            }
        }

        self.sprite_or_rect(
            "player",
            &snapshot.player.rect,
            camera,
            PLAYER,
            snapshot.player.facing,
        );

        self.hud(snapshot);
        if show_minimap {
            self.minimap(snapshot);
        }
        if snapshot.phase == LevelPhase::GameComplete {
            self.banner(&format!("You won! Final score {}", snapshot.score));
        }
    }

    fn fill(&self, rect: &Rect, camera: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            (rect.pos.x - camera) as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    /// Draw a sprite mirrored for `facing`, or a flat rectangle until it loads
    fn sprite_or_rect(&self, name: &str, rect: &Rect, camera: f32, color: &str, facing: Facing) {
        let ctx = &self.ctx;
        let x = (rect.pos.x - camera) as f64;
        let (y, w, h) = (rect.pos.y as f64, rect.size.x as f64, rect.size.y as f64);
        let drawn = self.sprites.borrow_mut().draw_with(name, |img| {
            ctx.save();
            if facing == Facing::Left {
                let _ = ctx.translate(x + w, y);
                let _ = ctx.scale(-1.0, 1.0);
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h);
            } else {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
            }
            ctx.restore();
        });
        if !drawn {
            self.fill(rect, camera, color);
        }
    }

    fn hud(&self, snapshot: &RenderSnapshot) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(TEXT);
        ctx.set_font("20px sans-serif");
        let _ = ctx.fill_text(&format!("Score: {}", snapshot.score), 20.0, 80.0);
        let _ = ctx.fill_text(
            &format!(
                "Level {}/{}  Apples {}/{}",
                snapshot.level_index + 1,
                snapshot.level_count,
                snapshot.collected,
                snapshot.required
            ),
            20.0,
            105.0,
        );

        // Progress bar
        let bar_width = 200.0;
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.4)");
        ctx.fill_rect(20.0, 115.0, bar_width, 10.0);
        ctx.set_fill_style_str(PLATFORM_TOP);
        ctx.fill_rect(20.0, 115.0, bar_width * snapshot.progress_ratio as f64, 10.0);
    }

    fn minimap(&self, snapshot: &RenderSnapshot) {
        let ctx = &self.ctx;
        let scale = snapshot.minimap_scale(MINIMAP_WIDTH);
        let vscale = if snapshot.level_size.y > 0.0 {
            MINIMAP_HEIGHT / snapshot.level_size.y
        } else {
            0.0
        };
        let origin_x = self.width as f32 - MINIMAP_WIDTH - MINIMAP_MARGIN;
        let origin_y = MINIMAP_MARGIN;

        let dot = |rect: &Rect, color: &str| {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(
                (origin_x + rect.pos.x * scale) as f64,
                (origin_y + rect.pos.y * vscale) as f64,
                (rect.size.x * scale).max(2.0) as f64,
                (rect.size.y * vscale).max(2.0) as f64,
            );
        };

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill_rect(
            origin_x as f64,
            origin_y as f64,
            MINIMAP_WIDTH as f64,
            MINIMAP_HEIGHT as f64,
        );
        for platform in &snapshot.platforms {
            dot(platform, PLATFORM);
        }
        for item in snapshot.collectibles.iter().filter(|c| !c.collected) {
            dot(&item.rect, APPLE);
        }
        for hazard in &snapshot.hazards {
            dot(&hazard.rect, HAZARD);
        }
        dot(&snapshot.player.rect, PLAYER);

        // Viewport outline
        ctx.set_stroke_style_str(TEXT);
        ctx.stroke_rect(
            (origin_x + snapshot.camera_x * scale) as f64,
            origin_y as f64,
            self.width * scale as f64,
            MINIMAP_HEIGHT as f64,
        );
    }

    fn dialogue_box(&self, line: &str) {
        let ctx = &self.ctx;
        let (x, y, w, h) = (40.0, self.height - 110.0, self.width - 80.0, 70.0);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(x, y, w, h);
        ctx.set_fill_style_str(TEXT);
        ctx.set_font("18px sans-serif");
        let _ = ctx.fill_text(line, x + 20.0, y + 40.0);
    }

    fn banner(&self, text: &str) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        ctx.set_fill_style_str(TEXT);
        ctx.set_font("36px sans-serif");
        let _ = ctx.fill_text(text, self.width / 2.0 - 180.0, self.height / 2.0);
    }
}
