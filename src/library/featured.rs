// Bookshelf - Book search and favorites core
// Copyright (C) 2025 Bookshelf contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Built-in featured list shown before any search

use crate::library::models::{Book, Category};

struct FeaturedEntry {
    id: &'static str,
    title: &'static str,
    author: &'static str,
    category: &'static str,
    description: &'static str,
    thumbnail: &'static str,
    year: &'static str,
}

const FEATURED: [FeaturedEntry; 5] = [
    FeaturedEntry {
        id: "featured1",
        title: "To Kill a Mockingbird",
        author: "Harper Lee",
        category: "Fiction",
        description: "A story about racial injustice and moral growth in the 1930s American South, seen through the eyes of young Scout Finch.",
        thumbnail: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=300&h=400&fit=crop",
        year: "1960",
    },
    FeaturedEntry {
        id: "featured2",
        title: "Sapiens: A Brief History of Humankind",
        author: "Yuval Noah Harari",
        category: "Non-Fiction",
        description: "An overview of human history, from the Stone Age to modern times, exploring key developments and revolutions.",
        thumbnail: "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=300&h=400&fit=crop",
        year: "2011",
    },
    FeaturedEntry {
        id: "featured3",
        title: "The Girl with the Dragon Tattoo",
        author: "Stieg Larsson",
        category: "Mystery",
        description: "A journalist and a hacker investigate a decades-old disappearance, uncovering dark family secrets.",
        thumbnail: "https://images.unsplash.com/photo-1543002588-bfa74002ed7e?w=300&h=400&fit=crop",
        year: "2005",
    },
    FeaturedEntry {
        id: "featured4",
        title: "The Guns of August",
        author: "Barbara W. Tuchman",
        category: "History",
        description: "A detailed account of the first month of World War I and the events leading up to it.",
        thumbnail: "https://images.unsplash.com/photo-1589829085413-56de8ae18c73?w=300&h=400&fit=crop",
        year: "1962",
    },
    FeaturedEntry {
        id: "featured5",
        title: "Dune",
        author: "Frank Herbert",
        category: "Science Fiction",
        description: "A science fiction epic set on the desert planet Arrakis, focusing on power, betrayal, and survival.",
        thumbnail: "https://images.unsplash.com/photo-1518373714866-3f1478910cc0?w=300&h=400&fit=crop",
        year: "1965",
    },
];

/// The built-in featured books, in display order
pub fn featured_books() -> Vec<Book> {
    FEATURED
        .iter()
        .map(|entry| Book {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            authors: vec![entry.author.to_string()],
            categories: vec![entry.category.to_string()],
            description: entry.description.to_string(),
            thumbnail_url: entry.thumbnail.to_string(),
            published_year: entry.year.to_string(),
            rating: None,
            page_count: None,
            preview_link: None,
        })
        .collect()
}

/// Client-side category filter over a featured list, preserving order
pub fn filter_by_category(books: &[Book], category: Category) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.matches_category(category))
        .cloned()
        .collect()
}
