use crate::utils::*;
use assetsweeper_core::{self as game, ToNdIndex};
use bitflags::bitflags;
use game::{CellVisual, Coord2, Difficulty, GameReport, GameSession, Hud, PointerAction, PointerButton, PowerUp};
use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use ndarray::Array2;
use wasm_bindgen::JsCast;
use yew::prelude::*;

const TOAST_MS: u32 = 1800;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    fn pointer_button(self) -> Option<PointerButton> {
        if self.contains(Self::RIGHT) {
            Some(PointerButton::Secondary)
        } else if self.contains(Self::LEFT) {
            Some(PointerButton::Primary)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Down(Coord2, PointerButton),
    Up(Coord2),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    LongPressElapsed,
    Key(game::Key),
    Tick,
    Relayout,
    Power(PowerUp),
    Start(Difficulty),
    PlayAgain,
    ToggleHowTo,
    ToastExpired,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    coords: Coord2,
    visual: CellVisual,
    #[prop_or_default]
    selected: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use CellVisual::*;

    let CellProps {
        coords,
        visual,
        selected,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match visual {
            Hidden => classes!(),
            Flagged => classes!("flag"),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Mine { triggered: true } => classes!("open", "mine", "oops"),
            Mine { triggered: false } => classes!("open", "mine"),
            Defused => classes!("flag", "defused"),
        }
    );
    if selected {
        class.push("selected");
    }

    let (text, color) = cell_face(visual);
    let style = color.map(|color| format!("color: {}", color));

    let onpointerdown = {
        let callback = callback.clone();
        Callback::from(move |e: PointerEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            log::trace!("{:?} pointer down ({:?})", coords, buttons);
            if let Some(button) = buttons.pointer_button() {
                callback.emit(CellMsg::Down(coords, button));
            }
        })
    };

    let onpointerup = {
        let callback = callback.clone();
        Callback::from(move |_: PointerEvent| {
            log::trace!("{:?} pointer up", coords);
            callback.emit(CellMsg::Up(coords));
        })
    };

    let onpointerleave = {
        let callback = callback.clone();
        Callback::from(move |_: PointerEvent| {
            log::trace!("{:?} pointer leave", coords);
            callback.emit(CellMsg::Leave);
        })
    };

    html! {
        <td {class} {style} {onpointerdown} {onpointerup} {onpointerleave}>{text}</td>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct SweeperProps {
    pub seed: Option<u64>,
    pub difficulty: Option<Difficulty>,
}

/// Renders a [`GameSession`] from the events it queues.
pub(crate) struct SweeperApp {
    session: Option<GameSession<game::EventQueue>>,
    tiles: Array2<CellVisual>,
    hud: Option<Hud>,
    report: Option<GameReport>,
    start_open: bool,
    howto_open: bool,
    toast: Option<&'static str>,
    _toast_timeout: Option<Timeout>,
    long_press: Option<Timeout>,
    _timer_interval: Interval,
    _keydown: EventListener,
    _resize: EventListener,
}

impl SweeperApp {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1000, move || link.send_message(Msg::Tick))
    }

    fn create_keydown_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(key) = game::Key::from_key_name(&event.key()) {
                event.prevent_default();
                link.send_message(Msg::Key(key));
            }
        })
    }

    fn create_resize_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Relayout)
        })
    }

    fn start(&mut self, ctx: &Context<Self>, difficulty: Difficulty) {
        match self.session.as_mut() {
            Some(session) => session.start(difficulty),
            None => {
                let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
                self.session = Some(GameSession::new(game::EventQueue::default(), seed, difficulty));
            }
        }
        self.report = None;
        self.start_open = false;
        self.long_press = None;
    }

    fn on_cell(&mut self, ctx: &Context<Self>, msg: CellMsg) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match msg {
            CellMsg::Down(coords, button) => {
                if let PointerAction::StartLongPress(coords) = session.pointer_down(coords, button) {
                    log::trace!("long press armed at {:?}", coords);
                    let link = ctx.link().clone();
                    self.long_press = Some(Timeout::new(game::LONG_PRESS_MS, move || {
                        link.send_message(Msg::LongPressElapsed)
                    }));
                }
            }
            CellMsg::Up(coords) => {
                self.long_press = None;
                session.pointer_up(coords);
            }
            CellMsg::Leave => {
                self.long_press = None;
                session.pointer_leave();
            }
        }
        true
    }

    /// Applies whatever the session queued since the last update.
    fn flush_events(&mut self, ctx: &Context<Self>) -> bool {
        use game::ViewEvent::*;

        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let events: Vec<_> = session.view_mut().drain().collect();
        let updated = !events.is_empty();
        for event in events {
            match event {
                BoardRebuilt(size) => {
                    self.tiles = Array2::from_elem(size.to_nd_index(), CellVisual::Hidden);
                }
                CellChanged(coords, visual) => {
                    if let Some(tile) = self.tiles.get_mut(coords.to_nd_index()) {
                        *tile = visual;
                    }
                }
                HudChanged(hud) => self.hud = Some(hud),
                GameEnded(report) => {
                    self.long_press = None;
                    self.report = Some(report);
                }
                Notice(notice) => {
                    let link = ctx.link().clone();
                    self.toast = Some(notice.message());
                    self._toast_timeout = Some(Timeout::new(TOAST_MS, move || {
                        link.send_message(Msg::ToastExpired)
                    }));
                }
            }
        }
        updated
    }

    fn view_hud(&self, ctx: &Context<Self>) -> Html {
        let Some(hud) = self.hud else {
            return html! {};
        };
        html! {
            <nav>
                <aside class="difficulty">{hud.difficulty.label()}</aside>
                <aside class="mines">{hud.mines_remaining.to_string()}</aside>
                <aside class="timer">{format_time(hud.elapsed_secs)}</aside>
                <span class="powers">
                    {
                        for hud.charges.iter().map(|(power, charges)| {
                            let class = classes!(
                                "power-button",
                                (hud.active_power == Some(power)).then_some("active"),
                                (charges == 0 && power != PowerUp::Undo).then_some("spent"),
                            );
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Power(power));
                            html! {
                                <button {class} {onclick}>
                                    {power.label()}
                                    <span class="count">{charges.to_string()}</span>
                                </button>
                            }
                        })
                    }
                </span>
                <small onclick={ctx.link().callback(|_| Msg::ToggleHowTo)}>{"?"}</small>
            </nav>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            return html! {};
        };
        let selection = session.selection();
        let (rows, cols) = self.tiles.dim();
        html! {
            <table class={(!session.is_finished()).then_some("playable")}>
                {
                    for (0..rows).map(|row| html! {
                        <tr>
                            {
                                for (0..cols).map(|col| {
                                    let visual = self.tiles[[row, col]];
                                    // board dimensions come from `Coord2`, so indexes fit
                                    let coords = (row as game::Coord, col as game::Coord);
                                    let selected = coords == selection;
                                    let callback = ctx.link().callback(Msg::CellEvent);
                                    html! {
                                        <CellView {coords} {visual} {selected} {callback}/>
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }

    fn view_start(&self, ctx: &Context<Self>) -> Html {
        html! {
            <Modal open={self.start_open}>
                <h2>{"AssetSweeper"}</h2>
                <p>{"Pick a network size to scan."}</p>
                <div class="difficulty-buttons">
                    {
                        for Difficulty::ALL.into_iter().map(|difficulty| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Start(difficulty));
                            html! { <button {onclick}>{difficulty.label()}</button> }
                        })
                    }
                </div>
                <button onclick={ctx.link().callback(|_| Msg::ToggleHowTo)}>{"How to play"}</button>
            </Modal>
        }
    }

    fn view_howto(&self, ctx: &Context<Self>) -> Html {
        html! {
            <Modal open={self.howto_open}>
                <h2>{"How to play"}</h2>
                <ul>
                    <li>{"Reveal every safe asset. Numbers count vulnerable neighbors."}</li>
                    <li>{"Right click or hold for a moment to flag. Arrows move, Space reveals, F flags."}</li>
                    <li>{"Firewall blocks one incident, Port Scanner reveals a 3x3 area safely."}</li>
                    <li>{"Network Map reveals a random hidden cluster, Undo rolls back the last action."}</li>
                    <li>{"Win by revealing every safe asset with every vulnerable one flagged."}</li>
                </ul>
                <button onclick={ctx.link().callback(|_| Msg::ToggleHowTo)}>{"Close"}</button>
            </Modal>
        }
    }

    fn view_report(&self, ctx: &Context<Self>) -> Html {
        let Some(report) = self.report else {
            return html! {};
        };
        let detail = match report {
            GameReport::Won {
                elapsed_secs,
                flags_used,
                power_ups_used,
            } => format!(
                "Time: {} · Flags used: {} · Power-ups used: {}",
                format_time(elapsed_secs),
                flags_used,
                power_ups_used,
            ),
            GameReport::Lost { .. } => "A vulnerable asset was hit.".to_string(),
        };
        let title = if report.is_win() {
            "Network secured"
        } else {
            "Breach detected"
        };
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::PlayAgain);
        html! {
            <Modal open={true}>
                <h2>{title}</h2>
                <p>{detail}</p>
                <button {onclick}>{"Play again"}</button>
            </Modal>
        }
    }
}

impl Component for SweeperApp {
    type Message = Msg;
    type Properties = SweeperProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            session: None,
            tiles: Array2::from_elem((0, 0), CellVisual::Hidden),
            hud: None,
            report: None,
            start_open: true,
            howto_open: false,
            toast: None,
            _toast_timeout: None,
            long_press: None,
            _timer_interval: SweeperApp::create_timer(ctx),
            _keydown: SweeperApp::create_keydown_listener(ctx),
            _resize: SweeperApp::create_resize_listener(ctx),
        };
        if let Some(difficulty) = ctx.props().difficulty {
            app.start(ctx, difficulty);
            app.flush_events(ctx);
        }
        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            CellEvent(cell_msg) => self.on_cell(ctx, cell_msg),
            LongPressElapsed => {
                self.long_press = None;
                self.session
                    .as_mut()
                    .is_some_and(|session| session.long_press_elapsed())
            }
            Key(key) => self
                .session
                .as_mut()
                .is_some_and(|session| session.handle_key(key)),
            Tick => {
                if let Some(session) = self.session.as_mut() {
                    session.tick();
                }
                false
            }
            Relayout => {
                if let Some(session) = self.session.as_mut() {
                    session.relayout();
                }
                false
            }
            Power(power) => self
                .session
                .as_mut()
                .is_some_and(|session| session.activate_power(power)),
            Start(difficulty) => {
                log::debug!("start: {}", difficulty);
                self.start(ctx, difficulty);
                true
            }
            PlayAgain => {
                self.report = None;
                self.start_open = true;
                true
            }
            ToggleHowTo => {
                self.howto_open = !self.howto_open;
                true
            }
            ToastExpired => self.toast.take().is_some(),
        };

        self.flush_events(ctx) || updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="assetsweeper" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                {self.view_hud(ctx)}
                {self.view_board(ctx)}
                if let Some(message) = self.toast {
                    <div class="toast show">{message}</div>
                }
                {self.view_start(ctx)}
                {self.view_howto(ctx)}
                {self.view_report(ctx)}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_button_wins_over_left() {
        let both = MouseButtons::LEFT | MouseButtons::RIGHT;

        assert_eq!(both.pointer_button(), Some(PointerButton::Secondary));
        assert_eq!(MouseButtons::LEFT.pointer_button(), Some(PointerButton::Primary));
        assert_eq!(MouseButtons::MIDDLE.pointer_button(), None);
    }
}
