#[cfg(test)]
mod library;
