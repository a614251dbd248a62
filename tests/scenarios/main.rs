mod codec;
mod locator;
mod pipeline;
mod support;
