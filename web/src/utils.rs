use assetsweeper_core::CellVisual;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    pub open: bool,
    #[prop_or_default]
    pub children: Html,
}

/// Renders the dialog into document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    if !props.open {
        return html! {};
    }
    let modal_host = gloo::utils::body();
    create_portal(
        html! { <div class="modal show">{props.children.clone()}</div> },
        modal_host.into(),
    )
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub(crate) const fn number_color(count: u8) -> &'static str {
    match count {
        1 | 6 => "#27C686",
        2 | 7 => "#FF8A00",
        3 | 8 => "#FF5F3D",
        4 => "#D1D3D3",
        5 => "#F4F4F4",
        _ => "#393E46",
    }
}

/// Glyph and text color a cell is drawn with.
pub(crate) fn cell_face(visual: CellVisual) -> (String, Option<&'static str>) {
    use CellVisual::*;

    match visual {
        Hidden | Revealed(0) => (String::new(), None),
        Revealed(count) => (count.to_string(), Some(number_color(count))),
        Flagged => ("⚠".to_string(), Some("#FF5F3D")),
        Defused => ("🛡".to_string(), Some("#27C686")),
        Mine { .. } => ("💥".to_string(), None),
    }
}
