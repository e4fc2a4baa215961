//! Element model: immutable UI descriptions and deferred component calls.
//!
//! An [`Element`] is either a [`Container`] (children, box style, event
//! handlers) or a [`Text`] (styled runs). Children are [`Node`]s: nested
//! elements or [`Component`] calls that the reconciler resolves.

use crate::error::Result;
use crate::hooks::Hooks;
use crate::input::{KeyEvent, MouseEvent};
use crate::style::StyleFragment;
use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

/// What a handler asks the scheduler to do next.
///
/// Anything other than [`Continue`](Self::Continue) stops the search for
/// further handlers. Requests are applied at the start of the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Response {
    /// Not handled; keep looking.
    #[default]
    Continue,
    /// Handled; no further request.
    Consumed,
    /// Stop the run loop.
    Quit,
    /// Ring the terminal bell.
    Bell,
    /// Flip the border healing pass on or off.
    ToggleBorderHealing,
    /// Hand the current frame to the screenshot sink.
    Screenshot,
}

/// Key handler attached to a container.
pub type KeyHandler = Rc<dyn Fn(&KeyEvent) -> Response>;
/// Mouse handler attached to a container.
pub type MouseHandler = Rc<dyn Fn(&MouseEvent) -> Response>;
/// Click handler attached to a container.
pub type ClickHandler = Rc<dyn Fn() -> Response>;

/// Event handlers of a container.
#[derive(Clone, Default)]
pub struct Handlers {
    /// Called for key presses not consumed by a more specific box.
    pub on_key: Option<KeyHandler>,
    /// Called for mouse events over the border box.
    pub on_mouse: Option<MouseHandler>,
    /// Called when a press and release land on the same box.
    pub on_click: Option<ClickHandler>,
}

impl Handlers {
    /// True when no handler is set.
    pub const fn is_empty(&self) -> bool {
        self.on_key.is_none() && self.on_mouse.is_none() && self.on_click.is_none()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("on_key", &self.on_key.is_some())
            .field("on_mouse", &self.on_mouse.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// A box with children.
#[derive(Debug, Clone, Default)]
pub struct Container {
    /// Layout and visual style.
    pub style: StyleFragment,
    /// Child nodes in layout order.
    pub children: Vec<Node>,
    /// Event handlers.
    pub handlers: Handlers,
}

impl Container {
    /// An empty container with `style`.
    pub fn new(style: StyleFragment) -> Self {
        Self {
            style,
            children: Vec::new(),
            handlers: Handlers::default(),
        }
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Set the key handler.
    #[must_use]
    pub fn on_key(mut self, handler: impl Fn(&KeyEvent) -> Response + 'static) -> Self {
        self.handlers.on_key = Some(Rc::new(handler));
        self
    }

    /// Set the mouse handler.
    #[must_use]
    pub fn on_mouse(mut self, handler: impl Fn(&MouseEvent) -> Response + 'static) -> Self {
        self.handlers.on_mouse = Some(Rc::new(handler));
        self
    }

    /// Set the click handler.
    #[must_use]
    pub fn on_click(mut self, handler: impl Fn() -> Response + 'static) -> Self {
        self.handlers.on_click = Some(Rc::new(handler));
        self
    }
}

/// A run of text with its own style overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    /// The text. `\n` starts a new line.
    pub text: String,
    /// Merged over the enclosing text style.
    pub style: StyleFragment,
}

impl TextRun {
    /// A run with `style`.
    pub fn new(text: impl Into<String>, style: StyleFragment) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Inline text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    /// Box and typography style.
    pub style: StyleFragment,
    /// Content runs, drawn one after another.
    pub runs: Vec<TextRun>,
}

impl Text {
    /// A single-run text in the default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            style: StyleFragment::new(),
            runs: vec![TextRun::new(text, StyleFragment::new())],
        }
    }

    /// Set the text style.
    #[must_use]
    pub fn with_style(mut self, style: StyleFragment) -> Self {
        self.style = style;
        self
    }

    /// Append a styled run.
    #[must_use]
    pub fn run(mut self, text: impl Into<String>, style: StyleFragment) -> Self {
        self.runs.push(TextRun::new(text, style));
        self
    }
}

/// An immutable UI description.
#[derive(Debug, Clone)]
pub enum Element {
    /// A box with children.
    Container(Container),
    /// Inline text.
    Text(Text),
}

impl Element {
    /// Start a container with `style`.
    pub fn container(style: StyleFragment) -> Container {
        Container::new(style)
    }

    /// A plain text element.
    pub fn text(text: impl Into<String>) -> Text {
        Text::new(text)
    }

    /// The style of either variant.
    pub const fn style(&self) -> &StyleFragment {
        match self {
            Self::Container(c) => &c.style,
            Self::Text(t) => &t.style,
        }
    }

    /// Name of the variant, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Container(_) => "container",
            Self::Text(_) => "text",
        }
    }
}

impl From<Container> for Element {
    fn from(c: Container) -> Self {
        Self::Container(c)
    }
}

impl From<Text> for Element {
    fn from(t: Text) -> Self {
        Self::Text(t)
    }
}

/// Identity of a component function: its address plus the props type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    function: usize,
    props: TypeId,
}

type RenderFn = Rc<dyn Fn(&mut Hooks<'_>) -> Result<Node>>;

/// A deferred component call: a render function plus captured props.
///
/// # Example
///
/// ```
/// use trellis::{Component, Element, Hooks, Node};
///
/// fn greeting(_hooks: &mut Hooks<'_>, name: &String) -> trellis::Result<Node> {
///     Ok(Element::text(format!("hello {name}")).into())
/// }
///
/// let node: Node = Component::new(greeting, "world".to_string()).keyed("greeting").into();
/// ```
#[derive(Clone)]
pub struct Component {
    identity: ComponentIdentity,
    key: Option<String>,
    render: RenderFn,
}

impl Component {
    /// Wrap `render` and its `props`.
    pub fn new<P: 'static>(render: fn(&mut Hooks<'_>, &P) -> Result<Node>, props: P) -> Self {
        let identity = ComponentIdentity {
            function: render as usize,
            props: TypeId::of::<P>(),
        };
        let call: RenderFn = Rc::new(move |hooks: &mut Hooks<'_>| render(hooks, &props));
        Self {
            identity,
            key: None,
            render: call,
        }
    }

    /// Attach an identity key.
    #[must_use]
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The function identity.
    pub const fn identity(&self) -> ComponentIdentity {
        self.identity
    }

    /// The identity key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Invoke the render function.
    pub(crate) fn render(&self, hooks: &mut Hooks<'_>) -> Result<Node> {
        (self.render)(hooks)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("identity", &self.identity)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// A child slot: an element or a component call.
#[derive(Debug, Clone)]
pub enum Node {
    /// A concrete element.
    Element(Element),
    /// A component to be rendered by the reconciler.
    Component(Component),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

impl From<Container> for Node {
    fn from(c: Container) -> Self {
        Self::Element(Element::Container(c))
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Self::Element(Element::Text(t))
    }
}

impl From<Component> for Node {
    fn from(c: Component) -> Self {
        Self::Component(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(_: &mut Hooks<'_>, _: &u32) -> Result<Node> {
        Ok(Element::text("a").into())
    }

    fn b(_: &mut Hooks<'_>, _: &u32) -> Result<Node> {
        Ok(Element::text("b").into())
    }

    #[test]
    fn test_component_identity() {
        assert_eq!(Component::new(a, 1).identity(), Component::new(a, 2).identity());
        assert_ne!(Component::new(a, 1).identity(), Component::new(b, 1).identity());
        assert_eq!(Component::new(a, 1).keyed("k").key(), Some("k"));
    }

    #[test]
    fn test_container_builder() {
        let c = Element::container(StyleFragment::new())
            .child(Element::text("x"))
            .children(vec![Text::new("y"), Text::new("z")])
            .on_click(|| Response::Quit);
        assert_eq!(c.children.len(), 3);
        assert!(c.handlers.on_click.is_some());
        assert!(c.handlers.on_key.is_none());
        let click = c.handlers.on_click.as_ref().map(|h| h());
        assert_eq!(click, Some(Response::Quit));
    }
}
