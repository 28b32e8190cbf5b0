mod app_flow;
mod manipulator;
mod render;
