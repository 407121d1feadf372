mod config;
mod render;
mod signin_flow;
