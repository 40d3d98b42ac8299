pub mod html_page;
pub mod yahoo_search;
