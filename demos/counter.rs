//! Counter demo: state, keyboard and mouse handlers, a ticking effect.
//!
//! Keys: `+`/`-` change the focused counter, `tab` switches focus, `h`
//! toggles border healing, `q` quits. Click a panel to focus it.
//! Set `TRELLIS_LOG=trellis=debug` to write a log to `trellis.log`.

use std::time::Duration;
use trellis::style::{BorderSides, TextJustify};
use trellis::{
    BorderKind, Component, Deps, Direction, Edges, Element, Hooks, KeyCode, Node, Response, Rgb,
    Size, StyleFragment, Text,
};

const ACCENT: Rgb = Rgb::new(120, 180, 255);
const DIM: Rgb = Rgb::new(110, 110, 120);

#[derive(Clone, PartialEq)]
struct PanelProps {
    title: &'static str,
    value: i64,
    focused: bool,
}

fn panel(_hooks: &mut Hooks<'_>, props: &PanelProps) -> trellis::Result<Node> {
    let border = if props.focused { ACCENT } else { DIM };
    Ok(Element::container(
        StyleFragment::new()
            .with_width(Size::Weight(1))
            .with_border(BorderKind::Rounded)
            .with_border_fg(border)
            .with_padding(Edges::symmetric(0, 1))
            .with_text_justify(TextJustify::Center),
    )
    .child(Text::new(props.title).with_style(StyleFragment::new().with_fg(border)))
    .child(Text::new(props.value.to_string()))
    .into())
}

fn uptime(hooks: &mut Hooks<'_>, _: &()) -> trellis::Result<Node> {
    let (seconds, set_seconds) = hooks.use_state(0u64)?;
    hooks.use_effect(Deps::ALWAYS, move |ctx| {
        ctx.sleep(Duration::from_secs(1))?;
        set_seconds.update(|s| s + 1);
        Ok(())
    })?;
    Ok(Element::text(format!("up {seconds}s"))
        .with_style(StyleFragment::new().with_fg(DIM))
        .into())
}

fn app(hooks: &mut Hooks<'_>, _: &()) -> trellis::Result<Node> {
    let (counts, set_counts) = hooks.use_state([0i64; 2])?;
    let (focus, set_focus) = hooks.use_state(0usize)?;

    let panels = ["left", "right"].into_iter().enumerate().map(|(i, title)| {
        let set_focus = set_focus.clone();
        Element::container(StyleFragment::new().with_width(Size::Weight(1)))
            .child(
                Component::new(
                    panel,
                    PanelProps {
                        title,
                        value: counts[i],
                        focused: focus == i,
                    },
                )
                .keyed(title),
            )
            .on_click(move || {
                set_focus.set(i);
                Response::Consumed
            })
    });

    Ok(Element::container(StyleFragment::new().with_padding(Edges::all(1)))
        .child(Element::text("trellis counter").with_style(
            StyleFragment::new().with_fg(ACCENT),
        ))
        .child(
            Element::container(
                StyleFragment::new()
                    .with_direction(Direction::Row)
                    .with_height(Size::Cells(6))
                    .with_gap(-1),
            )
            .children(panels),
        )
        .child(
            Element::container(
                StyleFragment::new()
                    .with_border(BorderKind::Light)
                    .with_border_sides(BorderSides::TOP)
                    .with_border_fg(DIM),
            )
            .child(Component::new(uptime, ())),
        )
        .on_key(move |key| {
            let bump = |delta: i64| {
                set_counts.update(|c| {
                    let mut next = *c;
                    next[focus] += delta;
                    next
                });
                Response::Consumed
            };
            match key.code {
                KeyCode::Char('+') => bump(1),
                KeyCode::Char('-') => bump(-1),
                KeyCode::Tab => {
                    set_focus.set(1 - focus);
                    Response::Consumed
                }
                KeyCode::Char('h') => Response::ToggleBorderHealing,
                KeyCode::Char('q') => Response::Quit,
                _ => Response::Continue,
            }
        })
        .into())
}

fn main() -> trellis::Result<()> {
    if std::env::var_os(trellis::logging::LOG_ENV).is_some() {
        let file = std::fs::File::create("trellis.log")?;
        trellis::logging::init_logging(std::sync::Mutex::new(file));
    }
    trellis::run(Component::new(app, ()))
}
