//! Tree factory.
//!
//! `h` builds HTML nodes, `svg` builds SVG nodes. Both are pure. The [`h!`]
//! and [`svg!`] macros accept a variadic child list where each argument can
//! be a node, a string, an `Option` or a `Vec` of those; collections are
//! flattened in place.
//!
//! ```rust,ignore
//! let page = h!("div", { "className" => "app" },
//!     h!("h1", {}, "Title"),
//!     paragraphs,              // Vec<VNode>, spliced in
//!     "trailing text"
//! );
//! ```
//!
//! [`h!`]: crate::h
//! [`svg!`]: crate::svg

use super::node::{Child, Namespace, VNode};
use super::props::Properties;

/// Values that contribute zero or more children to a child list.
pub trait IntoChildren {
    fn into_children(self, out: &mut Vec<Child>);
}

impl IntoChildren for Child {
    fn into_children(self, out: &mut Vec<Child>) {
        out.push(self);
    }
}

impl IntoChildren for VNode {
    fn into_children(self, out: &mut Vec<Child>) {
        out.push(Child::Element(self));
    }
}

impl IntoChildren for &VNode {
    fn into_children(self, out: &mut Vec<Child>) {
        out.push(Child::Element(self.clone()));
    }
}

impl IntoChildren for &str {
    fn into_children(self, out: &mut Vec<Child>) {
        out.push(Child::Text(self.to_string()));
    }
}

impl IntoChildren for String {
    fn into_children(self, out: &mut Vec<Child>) {
        out.push(Child::Text(self));
    }
}

impl<T: IntoChildren> IntoChildren for Option<T> {
    fn into_children(self, out: &mut Vec<Child>) {
        if let Some(inner) = self {
            inner.into_children(out);
        }
    }
}

impl<T: IntoChildren> IntoChildren for Vec<T> {
    fn into_children(self, out: &mut Vec<Child>) {
        for item in self {
            item.into_children(out);
        }
    }
}

/// Build a virtual node. Missing properties default to an empty map.
pub fn build<C>(namespace: Namespace, tag: &str, props: Option<Properties>, children: C) -> VNode
where
    C: IntoChildren,
{
    let mut flat = Vec::new();
    children.into_children(&mut flat);
    VNode::new(namespace, tag, props.unwrap_or_default(), flat)
}

/// Build an HTML node.
pub fn h<C: IntoChildren>(tag: &str, props: Option<Properties>, children: C) -> VNode {
    build(Namespace::Html, tag, props, children)
}

/// Build an SVG node.
pub fn svg<C: IntoChildren>(tag: &str, props: Option<Properties>, children: C) -> VNode {
    build(Namespace::Svg, tag, props, children)
}

/// Build an HTML node: `h!(tag)` or `h!(tag, { key => value, .. }, children..)`.
#[macro_export]
macro_rules! h {
    ($tag:expr) => {
        $crate::vdom::h($tag, ::std::option::Option::None, ::std::vec::Vec::<$crate::vdom::Child>::new())
    };
    ($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)*) => {{
        #[allow(unused_mut)]
        let mut children = ::std::vec::Vec::<$crate::vdom::Child>::new();
        $( $crate::vdom::IntoChildren::into_children($child, &mut children); )*
        $crate::vdom::h(
            $tag,
            ::std::option::Option::Some($crate::props! { $($key => $value),* }),
            children,
        )
    }};
}

/// Build an SVG node; same forms as [`h!`](crate::h).
#[macro_export]
macro_rules! svg {
    ($tag:expr) => {
        $crate::vdom::svg($tag, ::std::option::Option::None, ::std::vec::Vec::<$crate::vdom::Child>::new())
    };
    ($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)*) => {{
        #[allow(unused_mut)]
        let mut children = ::std::vec::Vec::<$crate::vdom::Child>::new();
        $( $crate::vdom::IntoChildren::into_children($child, &mut children); )*
        $crate::vdom::svg(
            $tag,
            ::std::option::Option::Some($crate::props! { $($key => $value),* }),
            children,
        )
    }};
}
