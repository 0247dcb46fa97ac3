mod handle;
mod meta;
