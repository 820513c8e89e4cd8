mod common;
mod interpretation;
mod routing;
