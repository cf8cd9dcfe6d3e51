mod main_menu;
mod result_view;

pub use main_menu::show_main_menu;
pub use result_view::render_state;
