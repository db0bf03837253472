//! Buddy Toss entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

    use buddy_toss::Tuning;
    use buddy_toss::sim::{ArenaBounds, SimEvent, Simulation, advance};
    use buddy_toss::stats::SessionStats;

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        arena: HtmlElement,
        buddy: Option<HtmlElement>,
        missile: Option<HtmlElement>,
        /// Pending animation frame, cancelled on teardown
        frame_handle: Option<i32>,
        running: bool,
    }

    impl Game {
        fn new(seed: u64, arena: HtmlElement) -> Self {
            let document = web_sys::window().and_then(|w| w.document());
            let element = |id: &str| {
                document
                    .as_ref()
                    .and_then(|d| d.get_element_by_id(id))
                    .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            };
            Self {
                sim: Simulation::new(seed, Tuning::load()),
                buddy: element("buddy"),
                missile: element("missile"),
                arena,
                frame_handle: None,
                running: true,
            }
        }

        /// Convert client coordinates into arena-local pixels
        fn local_pos(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.arena.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }

        fn bounds(&self) -> Option<ArenaBounds> {
            ArenaBounds::measured(
                self.arena.client_width() as f32,
                self.arena.client_height() as f32,
            )
        }

        /// Push the latest pose into the DOM
        fn render(&self) {
            let snapshot = self.sim.snapshot();
            let entity = &snapshot.entity;

            if let Some(buddy) = &self.buddy {
                let corner = entity.pos - entity.half_extents;
                let style = buddy.style();
                let _ = style.set_property(
                    "transform",
                    &format!(
                        "translate({:.1}px, {:.1}px) rotate({:.1}deg)",
                        corner.x, corner.y, entity.rotation
                    ),
                );
                let _ = buddy.set_attribute("data-hit", if entity.is_hit { "true" } else { "false" });
                let _ = buddy.set_attribute("data-dragged", if entity.is_dragged { "true" } else { "false" });
            }

            if let Some(el) = &self.missile {
                let style = el.style();
                match &snapshot.missile {
                    Some(missile) => {
                        let _ = style.set_property("display", "block");
                        let _ = style.set_property(
                            "transform",
                            &format!(
                                "translate({:.1}px, {:.1}px) rotate({:.1}deg)",
                                missile.current.x, missile.current.y, missile.rotation
                            ),
                        );
                    }
                    None => {
                        let _ = style.set_property("display", "none");
                    }
                }
            }
        }

        /// Forward simulation notifications to the console
        fn report_events(&mut self) {
            for event in self.sim.drain_events() {
                match event {
                    SimEvent::Poked => log::info!("Buddy poked! He's not amused."),
                    SimEvent::Hit { weapon_id, damage } => log::info!(
                        "{} hit for {} (session total {})",
                        SessionStats::display_name(&weapon_id),
                        damage,
                        self.sim.stats.total_damage
                    ),
                    SimEvent::Missed { weapon_id } => {
                        log::info!("{} missed", SessionStats::display_name(&weapon_id))
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        /// Same timebase as `Event::time_stamp`, monotonic
        fn now() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map_or_else(js_sys::Date::now, |p| p.now())
        }

        /// Stop the loop and drop everything pending
        fn teardown(&mut self) {
            self.running = false;
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            self.sim.teardown();

            let stats = &self.sim.stats;
            if !stats.is_empty() {
                log::info!(
                    "Session (seed {}): {} damage, favourite weapon {}",
                    self.sim.seed,
                    stats.total_damage,
                    stats
                        .favourite_weapon()
                        .map(SessionStats::display_name)
                        .unwrap_or_else(|| "none".to_string())
                );
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Buddy Toss starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, nothing to attach to");
            return;
        };
        let Some(arena) = document
            .get_element_by_id("arena")
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        else {
            log::error!("Missing #arena element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, arena.clone())));
        {
            let g = game.borrow();
            log::info!(
                "Simulation initialized with seed: {} ({} weapons)",
                g.sim.seed,
                g.sim.weapons.len()
            );
        }

        setup_input_handlers(&arena, game.clone());
        setup_weapon_keys(game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);
        log::info!("Buddy Toss running!");
    }

    fn listen(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(arena: &HtmlElement, game: Rc<RefCell<Game>>) {
        // Pointer down - grab, aim or fire; capture so moves outside still count
        {
            let game = game.clone();
            let arena_clone = arena.clone();
            listen(arena, "pointerdown", move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                let pos = g.local_pos(event);
                if g.sim.pointer_down(pos, event.time_stamp()).is_accepted() {
                    let _ = arena_clone.set_pointer_capture(event.pointer_id());
                }
            });
        }

        // Pointer move
        {
            let game = game.clone();
            listen(arena, "pointermove", move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut g = game.borrow_mut();
                let pos = g.local_pos(event);
                g.sim.pointer_move(pos, event.time_stamp());
            });
        }

        // Pointer up - throw or fire
        {
            let game = game.clone();
            listen(arena, "pointerup", move |event| {
                game.borrow_mut().sim.pointer_up(event.time_stamp());
            });
        }

        // Lost capture / cancel counts as a release
        for name in ["pointercancel", "lostpointercapture"] {
            let game = game.clone();
            listen(arena, name, move |event| {
                game.borrow_mut().sim.pointer_cancel(event.time_stamp());
            });
        }

        // Click - poke
        {
            let game = game.clone();
            listen(arena, "click", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let mut g = game.borrow_mut();
                let pos = g.local_pos(event);
                g.sim.click(pos, event.time_stamp());
            });
        }
    }

    /// 0 = hand, 1..9 = weapon by catalog order
    fn setup_weapon_keys(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if game.borrow().sim.weapons.is_empty() {
            log::warn!("Weapon catalog is empty, number keys disabled");
            return;
        }
        listen(&window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(digit) = event.key().chars().next().and_then(|c| c.to_digit(10)) else {
                return;
            };
            let mut g = game.borrow_mut();
            let id = match digit {
                0 => None,
                n => match g.sim.weapons.weapons.get(n as usize - 1) {
                    Some(weapon) => Some(weapon.id.clone()),
                    None => return,
                },
            };
            g.sim.select_weapon(id.as_deref(), event.time_stamp());
        });
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        listen(&window, "pagehide", move |_event| {
            game.borrow_mut().teardown();
            log::info!("Buddy Toss stopped");
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_clone = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game_clone);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        game.borrow_mut().frame_handle = handle;
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if !g.running {
                return;
            }

            let bounds = g.bounds();
            if advance(&mut g.sim, bounds, Game::now()).is_some_and(|c| c.any()) {
                log::trace!("frame {}: edge contact", g.sim.frame);
            }
            g.render();
            g.report_events();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use buddy_toss::Tuning;
    use buddy_toss::sim::{ArenaBounds, Simulation, advance};
    use glam::Vec2;

    env_logger::init();
    log::info!("Buddy Toss (native) starting...");
    log::info!("Native mode runs a scripted session; build for wasm32 to play in the browser");

    let mut sim = Simulation::new(42, Tuning::load());
    let bounds = ArenaBounds::measured(640.0, 480.0);
    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;

    let step = |sim: &mut Simulation, frames: u32, now: &mut f64| {
        for _ in 0..frames {
            *now += frame_ms;
            if advance(sim, bounds, *now).is_some_and(|c| c.any()) {
                log::trace!("frame {}: edge contact", sim.frame);
            }
        }
    };

    // Let him land, grab and fling him, poke him, then send a missile
    step(&mut sim, 90, &mut now);
    let grab = sim.entity.pos;
    sim.pointer_down(grab, now);
    sim.pointer_move(grab + Vec2::new(-30.0, -40.0), now + 16.0);
    sim.pointer_move(grab + Vec2::new(-90.0, -100.0), now + 32.0);
    sim.pointer_up(now + 40.0);
    step(&mut sim, 120, &mut now);

    sim.click(sim.entity.pos, now);
    step(&mut sim, 60, &mut now);

    sim.select_weapon(Some("missile"), now);
    sim.pointer_down(sim.entity.pos, now);
    step(&mut sim, 120, &mut now);

    for event in sim.drain_events() {
        log::info!("{:?}", event);
    }
    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
    println!(
        "Seed {}: damage dealt {}, missile shots {}, favourite weapon {}",
        sim.seed,
        sim.stats.total_damage,
        sim.stats.uses("missile"),
        sim.stats.favourite_weapon().unwrap_or("none")
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
