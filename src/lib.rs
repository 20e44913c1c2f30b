#![doc(html_root_url = "https://docs.rs/keyed-vdom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A keyed virtual DOM reconciler.
//!
//! Build [`VNode`] trees with [`h`], then hand them to a [`Renderer`] together with a container node.
//! The first [`Renderer::render`] mounts the tree. Later ones patch the live tree in place,
//! reusing live nodes wherever the [`Kind`], tag and (among siblings) [`Key`] allow it.
//!
//! The renderer only talks to live nodes through a [`Platform`](`platform::Platform`):
//! [`memory::MemoryDom`] keeps them off-screen, and `web::WebPlatform` (with the `web` feature) targets the browser DOM.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod component;
mod data;
mod diff;
pub mod load;
pub mod memory;
mod mount;
pub mod mounted;
pub mod observer;
mod patch;
pub mod platform;
mod renderer;
pub mod vnode;

#[cfg(feature = "web")]
mod listener_cache;
#[cfg(feature = "web")]
pub mod web;

pub use component::{Component, FunctionalDef, Props, StatefulDef};
pub use renderer::{Error, Options, Renderer};
pub use vnode::{h, portal, text, Arity, Children, Data, Handler, Key, Kind, Tag, Target, VNode, Value, FRAGMENT, PORTAL, SVG};
