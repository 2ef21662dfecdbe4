pub(crate) mod board_text;
