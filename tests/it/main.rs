mod bloom;
mod encodings;
mod writer;
